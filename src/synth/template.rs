//! The fixed descriptor of the generated benchmark runner

use crate::pom::{Dependency, Property, Repository};
use crate::reconcile::ReconciledDescriptor;

/// Prefix of the properties the template defines for itself
pub const RESERVED_PROPERTY_PREFIX: &str = "jmhrbautobenchmark.";

const TEMPLATE_PROPERTIES: &[&str] = &["project.build.sourceEncoding"];

/// Name of the shaded jar, without extension
pub const UBERJAR_NAME: &str = "benchmarks";

pub const RUNNER_POM: &str = r#"<project xmlns="http://maven.apache.org/POM/4.0.0" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
         xsi:schemaLocation="http://maven.apache.org/POM/4.0.0 http://maven.apache.org/xsd/maven-4.0.0.xsd">
    <modelVersion>4.0.0</modelVersion>

    <groupId>{group-id}</groupId>
    <artifactId>jmh-generic-runner</artifactId>
    <version>{version}</version>
    <packaging>jar</packaging>

    <name>JMH Generic runner</name>

    <repositories>
{repositories}
    </repositories>

    <dependencies>
        <dependency>
            <groupId>org.openjdk.jmh</groupId>
            <artifactId>jmh-core</artifactId>
            <version>${jmhrbautobenchmark.jmh.version}</version>
        </dependency>
        <dependency>
            <groupId>org.openjdk.jmh</groupId>
            <artifactId>jmh-generator-annprocess</artifactId>
            <version>${jmhrbautobenchmark.jmh.version}</version>
            <scope>provided</scope>
        </dependency>
{dependencies}
    </dependencies>

    <properties>
{properties}
        <project.build.sourceEncoding>UTF-8</project.build.sourceEncoding>
        <jmhrbautobenchmark.jmh.version>{jmh-version}</jmhrbautobenchmark.jmh.version>
        <jmhrbautobenchmark.javac.target>{java-version}</jmhrbautobenchmark.javac.target>
        <jmhrbautobenchmark.uberjar.name>{uberjar-name}</jmhrbautobenchmark.uberjar.name>
    </properties>

    <build>
        <plugins>
            <plugin>
                <groupId>org.apache.maven.plugins</groupId>
                <artifactId>maven-compiler-plugin</artifactId>
                <version>3.8.0</version>
                <configuration>
                    <compilerVersion>${jmhrbautobenchmark.javac.target}</compilerVersion>
                    <source>${jmhrbautobenchmark.javac.target}</source>
                    <target>${jmhrbautobenchmark.javac.target}</target>
                </configuration>
            </plugin>
            <plugin>
                <groupId>org.apache.maven.plugins</groupId>
                <artifactId>maven-shade-plugin</artifactId>
                <version>3.2.1</version>
                <executions>
                    <execution>
                        <phase>package</phase>
                        <goals>
                            <goal>shade</goal>
                        </goals>
                        <configuration>
                            <finalName>${jmhrbautobenchmark.uberjar.name}</finalName>
                            <transformers>
                                <transformer implementation="org.apache.maven.plugins.shade.resource.ManifestResourceTransformer">
                                    <mainClass>org.openjdk.jmh.Main</mainClass>
                                </transformer>
                                <transformer implementation="org.apache.maven.plugins.shade.resource.ServicesResourceTransformer"/>
                            </transformers>
                            <filters>
                                <filter>
                                    <artifact>*:*</artifact>
                                    <excludes>
                                        <exclude>META-INF/*.SF</exclude>
                                        <exclude>META-INF/*.DSA</exclude>
                                        <exclude>META-INF/*.RSA</exclude>
                                    </excludes>
                                </filter>
                            </filters>
                        </configuration>
                    </execution>
                </executions>
            </plugin>
        </plugins>
        <pluginManagement>
            <plugins>
                <plugin>
                    <artifactId>maven-clean-plugin</artifactId>
                    <version>2.5</version>
                </plugin>
                <plugin>
                    <artifactId>maven-deploy-plugin</artifactId>
                    <version>2.8.1</version>
                </plugin>
                <plugin>
                    <artifactId>maven-install-plugin</artifactId>
                    <version>2.5.1</version>
                </plugin>
                <plugin>
                    <artifactId>maven-jar-plugin</artifactId>
                    <version>2.4</version>
                </plugin>
                <plugin>
                    <artifactId>maven-resources-plugin</artifactId>
                    <version>2.6</version>
                </plugin>
                <plugin>
                    <artifactId>maven-surefire-plugin</artifactId>
                    <version>2.17</version>
                </plugin>
            </plugins>
        </pluginManagement>
    </build>

</project>
"#;

/// Whether the template already defines a property with this name
pub fn is_reserved_property(name: &str) -> bool {
    name.starts_with(RESERVED_PROPERTY_PREFIX) || TEMPLATE_PROPERTIES.contains(&name)
}

pub fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn indent(level: usize) -> String {
    " ".repeat(level * 4)
}

pub fn render_dependency(dependency: &Dependency) -> String {
    let mut out = format!(
        "{pad}<dependency>\n\
         {inner}<groupId>{}</groupId>\n\
         {inner}<artifactId>{}</artifactId>\n\
         {inner}<version>{}</version>\n",
        escape_xml(&dependency.group_id),
        escape_xml(&dependency.artifact_id),
        escape_xml(&dependency.version),
        pad = indent(2),
        inner = indent(3),
    );
    if let Some(kind) = dependency.kind.as_str() {
        out.push_str(&format!("{}<type>{}</type>\n", indent(3), kind));
    }
    out.push_str(&format!("{}</dependency>", indent(2)));
    out
}

pub fn render_property(property: &Property) -> String {
    format!(
        "{}<{name}>{}</{name}>",
        indent(2),
        escape_xml(&property.value),
        name = property.name,
    )
}

pub fn render_repository(repository: &Repository) -> String {
    let mut out = format!(
        "{pad}<repository>\n\
         {inner}<id>{}</id>\n\
         {inner}<url>{}</url>\n",
        escape_xml(&repository.id),
        escape_xml(&repository.url),
        pad = indent(2),
        inner = indent(3),
    );
    if let Some(layout) = &repository.layout {
        out.push_str(&format!("{}<layout>{}</layout>\n", indent(3), escape_xml(layout)));
    }
    out.push_str(&format!("{}</repository>", indent(2)));
    out
}

fn render_block<T>(items: &[T], render: fn(&T) -> String) -> String {
    items.iter().map(render).collect::<Vec<_>>().join("\n")
}

/// Substitutes every placeholder of [`RUNNER_POM`]
pub fn render(descriptor: &ReconciledDescriptor) -> String {
    RUNNER_POM
        .replace("{group-id}", &escape_xml(&descriptor.group_id))
        .replace("{version}", &escape_xml(&descriptor.version))
        .replace("{java-version}", &escape_xml(&descriptor.java_version))
        .replace("{jmh-version}", &escape_xml(&descriptor.jmh_version))
        .replace("{uberjar-name}", UBERJAR_NAME)
        .replace(
            "{dependencies}",
            &render_block(&descriptor.dependencies, render_dependency),
        )
        .replace(
            "{properties}",
            &render_block(&descriptor.properties, render_property),
        )
        .replace(
            "{repositories}",
            &render_block(&descriptor.repositories, render_repository),
        )
}
