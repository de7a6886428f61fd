//! Project configuration. A project is rooted at the directory containing
//! `stanza.yaml`; [`Config::from_directory`] walks up from the starting
//! directory until it finds one. The project file carries the site's
//! identity, author, feature flags, navigation, and socials; the theme
//! lives in `theme/theme.yaml` next to it.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use serde::Deserialize;
use url::Url;

use crate::theme::Theme;

/// The site author, carried into the feed.
#[derive(Clone, Debug, Deserialize)]
pub struct Author {
    pub name: String,

    #[serde(default)]
    pub email: Option<String>,
}

/// Feature flags. Disabled features drop out of navigation and skip their
/// build outputs; nothing else consults them.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct Features {
    #[serde(default = "default_true")]
    pub rss: bool,

    #[serde(default)]
    pub work: bool,

    #[serde(default)]
    pub projects: bool,

    #[serde(default = "default_true")]
    pub search: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Features {
    fn default() -> Features {
        Features {
            rss: true,
            work: false,
            projects: false,
            search: true,
        }
    }
}

impl Features {
    /// Looks a flag up by name. Unknown names are simply disabled, so a
    /// link bound to a misspelled feature drops out of navigation instead
    /// of failing the build.
    pub fn is_enabled(&self, feature: &str) -> bool {
        match feature {
            "rss" => self.rss,
            "work" => self.work,
            "projects" => self.projects,
            "search" => self.search,
            _ => false,
        }
    }
}

/// A navigation link. A link bound to a feature flag is shown only while
/// that feature is enabled.
#[derive(Clone, Debug, Deserialize)]
pub struct Link {
    pub text: String,
    pub href: String,

    #[serde(default)]
    pub feature: Option<String>,
}

/// A social-profile entry for the footer.
#[derive(Clone, Debug, Deserialize)]
pub struct Social {
    pub name: String,
    pub icon: String,
    pub text: String,
    pub href: String,
}

/// Title and description for one of the site's listing pages.
#[derive(Clone, Debug, Deserialize)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
}

impl PageMeta {
    fn new(title: &str, description: &str) -> PageMeta {
        PageMeta {
            title: title.to_owned(),
            description: description.to_owned(),
        }
    }
}

/// Per-page metadata, defaulted page by page so a project file can restate
/// only the pages it cares about.
#[derive(Clone, Debug, Deserialize)]
pub struct Pages {
    #[serde(default = "Pages::default_blog")]
    pub blog: PageMeta,

    #[serde(default = "Pages::default_work")]
    pub work: PageMeta,

    #[serde(default = "Pages::default_projects")]
    pub projects: PageMeta,

    #[serde(default = "Pages::default_search")]
    pub search: PageMeta,
}

impl Pages {
    fn default_blog() -> PageMeta {
        PageMeta::new("Blog", "Writing on topics I am passionate about.")
    }

    fn default_work() -> PageMeta {
        PageMeta::new("Work", "Places I have worked.")
    }

    fn default_projects() -> PageMeta {
        PageMeta::new("Projects", "Recent projects I have worked on.")
    }

    fn default_search() -> PageMeta {
        PageMeta::new("Search", "Search all posts by keyword.")
    }
}

impl Default for Pages {
    fn default() -> Pages {
        Pages {
            blog: Pages::default_blog(),
            work: Pages::default_work(),
            projects: Pages::default_projects(),
            search: Pages::default_search(),
        }
    }
}

/// The raw shape of `stanza.yaml`.
#[derive(Deserialize)]
struct Project {
    /// The absolute root URL the site is served from. Should end with a
    /// trailing slash; without one [`Url::join`] treats the last path
    /// segment as a file name and drops it.
    site_root: Url,

    title: String,

    description: String,

    author: Author,

    /// Home page path relative to `site_root`; the site root itself when
    /// absent.
    #[serde(default)]
    home_page: Option<String>,

    #[serde(default)]
    features: Features,

    #[serde(default)]
    links: Vec<Link>,

    #[serde(default)]
    socials: Vec<Social>,

    #[serde(default)]
    pages: Pages,
}

/// Resolved configuration: the project file plus the derived paths and URLs
/// the rest of the crate consumes.
pub struct Config {
    pub site_root: Url,
    pub title: String,
    pub description: String,
    pub author: Author,
    pub home_page: Url,
    pub features: Features,
    pub links: Vec<Link>,
    pub socials: Vec<Social>,
    pub pages: Pages,
    pub theme: Theme,

    pub posts_source_directory: PathBuf,
    pub static_source_directory: PathBuf,
    pub posts_url: Url,
    pub tags_url: Url,
    pub root_output_directory: PathBuf,
    pub static_output_directory: PathBuf,
}

impl Config {
    /// Walks up from `dir` looking for `stanza.yaml` and loads the nearest
    /// one. Fails when no ancestor directory has a project file.
    pub fn from_directory(dir: &Path, output_directory: &Path) -> Result<Config> {
        let path = dir.join("stanza.yaml");
        if path.exists() {
            match Config::from_project_file(&path, output_directory) {
                Ok(config) => Ok(config),
                Err(e) => Err(anyhow!("Loading configuration: {:?}", e)),
            }
        } else {
            match dir.parent() {
                Some(parent) => Config::from_directory(parent, output_directory),
                None => Err(anyhow!(
                    "Could not find `stanza.yaml` in any parent directory"
                )),
            }
        }
    }

    /// Loads a specific project file. Directories resolve relative to the
    /// project file's parent; the theme file is optional and falls back to
    /// [`Theme::default`].
    pub fn from_project_file(path: &Path, output_directory: &Path) -> Result<Config> {
        let project: Project = serde_yaml::from_reader(open(path, "project")?)?;
        let project_root = path.parent().ok_or_else(|| {
            anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )
        })?;

        let theme_path = project_root.join("theme").join("theme.yaml");
        let theme = if theme_path.exists() {
            serde_yaml::from_reader(open(&theme_path, "theme")?)?
        } else {
            Theme::default()
        };

        let home_page = match &project.home_page {
            Some(page) => project.site_root.join(page)?,
            None => project.site_root.clone(),
        };

        Ok(Config {
            posts_url: project.site_root.join("posts/")?,
            tags_url: project.site_root.join("blog/tags/")?,
            home_page,
            posts_source_directory: project_root.join("posts"),
            static_source_directory: project_root.join("static"),
            root_output_directory: output_directory.to_owned(),
            static_output_directory: output_directory.join("static"),
            site_root: project.site_root,
            title: project.title,
            description: project.description,
            author: project.author,
            features: project.features,
            links: project.links,
            socials: project.socials,
            pages: project.pages,
            theme,
        })
    }

    /// The navigation links visible under the current feature flags: links
    /// bound to a disabled feature are omitted.
    pub fn nav_links(&self) -> Vec<&Link> {
        self.links
            .iter()
            .filter(|link| match &link.feature {
                Some(feature) => self.features.is_enabled(feature),
                None => true,
            })
            .collect()
    }
}

fn open(path: &Path, kind: &str) -> Result<File> {
    match File::open(path) {
        Err(e) => Err(anyhow!("Opening {} file `{}`: {}", kind, path.display(), e)),
        Ok(file) => Ok(file),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const PROJECT: &str = "\
site_root: https://example.org/
title: Example Site
description: A personal website.
author:
  name: Jo Example
  email: jo@example.org
features:
  work: false
  projects: true
links:
  - text: Home
    href: /
  - text: Work
    href: /work
    feature: work
  - text: Blog
    href: /blog
  - text: Projects
    href: /projects
    feature: projects
socials:
  - name: Github
    icon: github
    text: joexample
    href: https://github.com/joexample
";

    fn write_project(dir: &Path) -> std::io::Result<()> {
        std::fs::write(dir.join("stanza.yaml"), PROJECT)
    }

    #[test]
    fn test_from_project_file_resolves_paths_and_urls() -> Result<()> {
        let dir = tempfile::tempdir()?;
        write_project(dir.path())?;

        let config =
            Config::from_project_file(&dir.path().join("stanza.yaml"), Path::new("_site"))?;
        assert_eq!(config.title, "Example Site");
        assert_eq!(config.posts_url.as_str(), "https://example.org/posts/");
        assert_eq!(config.tags_url.as_str(), "https://example.org/blog/tags/");
        assert_eq!(config.home_page.as_str(), "https://example.org/");
        assert_eq!(config.posts_source_directory, dir.path().join("posts"));
        assert_eq!(
            config.static_output_directory,
            Path::new("_site").join("static")
        );
        // no theme/theme.yaml in the fixture, so the default theme loads
        assert!(!config.theme.scale.is_empty());
        Ok(())
    }

    #[test]
    fn test_nav_links_respect_feature_flags() -> Result<()> {
        let dir = tempfile::tempdir()?;
        write_project(dir.path())?;

        let config =
            Config::from_project_file(&dir.path().join("stanza.yaml"), Path::new("_site"))?;
        let texts: Vec<&str> = config.nav_links().iter().map(|l| l.text.as_str()).collect();
        // `work` is disabled, `projects` is enabled, unbound links always show
        assert_eq!(texts, vec!["Home", "Blog", "Projects"]);
        Ok(())
    }

    #[test]
    fn test_feature_defaults() {
        let features = Features::default();
        assert!(features.rss);
        assert!(features.search);
        assert!(!features.work);
        assert!(!features.projects);
        assert!(!features.is_enabled("no-such-feature"));
    }

    #[test]
    fn test_from_directory_walks_up() -> Result<()> {
        let dir = tempfile::tempdir()?;
        write_project(dir.path())?;
        let nested = dir.path().join("posts").join("drafts");
        std::fs::create_dir_all(&nested)?;

        let config = Config::from_directory(&nested, Path::new("_site"))?;
        assert_eq!(config.title, "Example Site");
        Ok(())
    }

    #[test]
    fn test_from_directory_fails_without_project_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        assert!(Config::from_directory(dir.path(), Path::new("_site")).is_err());
        Ok(())
    }

    #[test]
    fn test_pages_default_when_omitted() -> Result<()> {
        let dir = tempfile::tempdir()?;
        write_project(dir.path())?;

        let config =
            Config::from_project_file(&dir.path().join("stanza.yaml"), Path::new("_site"))?;
        assert_eq!(config.pages.blog.title, "Blog");
        assert_eq!(config.pages.search.title, "Search");
        Ok(())
    }
}
