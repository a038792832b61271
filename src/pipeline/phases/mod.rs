// Pipeline phases, in run order

#[path = "01_reset.rs"]
pub mod reset;
#[path = "02_project_build.rs"]
pub mod project_build;
#[path = "03_prepare.rs"]
pub mod prepare;
#[path = "04_benchmark_build.rs"]
pub mod benchmark_build;
#[path = "05_run.rs"]
pub mod run;
