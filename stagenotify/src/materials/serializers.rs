//! Descriptors for the built-in material kinds.

use super::descriptor::{ConfigurationSection, MaterialDescriptor};
use crate::domain::{
    DependencyMaterial, GitMaterial, MercurialMaterial, P4Material, PackageMaterial,
    PluggableScmMaterial, SvnMaterial, TfsMaterial,
};

/// Describes a git material.
#[must_use]
pub fn describe_git(material: &GitMaterial) -> MaterialDescriptor {
    MaterialDescriptor::new("git").with_configuration(
        ConfigurationSection::new()
            .text("url", &material.url)
            .text("branch", &material.branch),
    )
}

/// Describes a mercurial material.
#[must_use]
pub fn describe_mercurial(material: &MercurialMaterial) -> MaterialDescriptor {
    MaterialDescriptor::new("mercurial")
        .with_configuration(ConfigurationSection::new().text("url", &material.url))
}

/// Describes a subversion material.
#[must_use]
pub fn describe_svn(material: &SvnMaterial) -> MaterialDescriptor {
    MaterialDescriptor::new("svn").with_configuration(
        ConfigurationSection::new()
            .text("url", &material.url)
            .text("username", &material.username)
            .text("password", &material.password)
            .flag("check-externals", material.check_externals),
    )
}

/// Describes a TFS material.
#[must_use]
pub fn describe_tfs(material: &TfsMaterial) -> MaterialDescriptor {
    MaterialDescriptor::new("tfs").with_configuration(
        ConfigurationSection::new()
            .text("url", &material.url)
            .text("domain", &material.domain)
            .text("username", &material.username)
            .text("password", &material.password)
            .text("project-path", &material.project_path),
    )
}

/// Describes a perforce material. The server address goes out as `url`.
#[must_use]
pub fn describe_perforce(material: &P4Material) -> MaterialDescriptor {
    MaterialDescriptor::new("perforce").with_configuration(
        ConfigurationSection::new()
            .text("url", &material.server_and_port)
            .text("username", &material.username)
            .text("password", &material.password)
            .text("view", &material.view)
            .flag("use-tickets", material.use_tickets),
    )
}

/// Describes an upstream pipeline dependency.
#[must_use]
pub fn describe_dependency(material: &DependencyMaterial) -> MaterialDescriptor {
    MaterialDescriptor::new("pipeline").with_configuration(
        ConfigurationSection::new()
            .text("pipeline-name", &material.pipeline_name)
            .text("stage-name", &material.stage_name),
    )
}

/// Describes a package material. Repository and package configuration stay
/// in separate sections.
#[must_use]
pub fn describe_package(material: &PackageMaterial) -> MaterialDescriptor {
    MaterialDescriptor::new("package")
        .with_plugin_id(&material.plugin_id)
        .with_section(
            "repository-configuration",
            ConfigurationSection::from_plugin(&material.repository_configuration),
        )
        .with_section(
            "package-configuration",
            ConfigurationSection::from_plugin(&material.package_configuration),
        )
}

/// Describes a plugin SCM material.
#[must_use]
pub fn describe_pluggable_scm(material: &PluggableScmMaterial) -> MaterialDescriptor {
    MaterialDescriptor::new("scm")
        .with_plugin_id(&material.plugin_id)
        .with_configuration(ConfigurationSection::from_plugin(&material.scm_configuration))
        .with_section(
            "material-configuration",
            ConfigurationSection::from_plugin(&material.material_configuration),
        )
}
