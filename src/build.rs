//! Exports the [`build_site`] function which stitches together the
//! high-level steps of building the site's derived outputs: parsing the
//! posts ([`crate::post`]), writing the typographic stylesheet
//! ([`crate::theme`]), copying the static source directory into the static
//! output directory, and generating the Atom feed ([`crate::feed`]).

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::feed::{write_feed, Error as FeedError, FeedConfig};
use crate::post::{parse_posts, Error as ParseError};

/// Builds the site's outputs from a [`Config`] object. Feed generation is
/// skipped when the `rss` feature flag is off.
pub fn build_site(config: Config) -> Result<()> {
    // collect all posts
    let posts = parse_posts(
        &config.posts_source_directory,
        &config.posts_url,
        &config.tags_url,
    )?;

    // Blow away the old static output directory so we don't have any
    // collisions. The root output directory is left alone in case the user
    // accidentally passes a directory holding unrelated files.
    rmdir(&config.static_output_directory)?;

    // copy static directory, then drop the rendered stylesheet next to the
    // copied assets
    if config.static_source_directory.is_dir() {
        copy_dir(
            &config.static_source_directory,
            &config.static_output_directory,
        )?;
    } else {
        std::fs::create_dir_all(&config.static_output_directory)?;
    }
    std::fs::write(
        config.static_output_directory.join("typography.css"),
        config.theme.to_css(),
    )?;

    // create the atom feed
    if config.features.rss {
        write_feed(
            FeedConfig {
                title: config.title,
                id: config.home_page.to_string(),
                author: Some(config.author),
                home_page: config.home_page,
            },
            &posts,
            File::create(config.root_output_directory.join("feed.atom"))?,
        )?;
    }

    Ok(())
}

fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), target)?;
        }
    }

    Ok(())
}

fn rmdir(dir: &Path) -> Result<()> {
    match std::fs::remove_dir_all(dir) {
        Ok(x) => Ok(x),
        Err(e) => match e.kind() {
            std::io::ErrorKind::NotFound => Ok(()),
            _ => Err(Error::Clean {
                path: dir.to_owned(),
                err: e,
            }),
        },
    }
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building the site. Errors can be during parsing,
/// cleaning output directories, writing the feed, and other I/O.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors during parsing.
    Parse(ParseError),

    /// Returned for I/O problems while cleaning output directories.
    Clean { path: PathBuf, err: std::io::Error },

    /// Returned for errors writing the feed.
    Feed(FeedError),

    /// Returned for other I/O errors.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Parse(err) => err.fmt(f),
            Error::Clean { path, err } => {
                write!(f, "Cleaning directory '{}': {}", path.display(), err)
            }
            Error::Feed(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(err) => Some(err),
            Error::Clean { path: _, err } => Some(err),
            Error::Feed(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<ParseError> for Error {
    /// Converts [`ParseError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: ParseError) -> Error {
        Error::Parse(err)
    }
}

impl From<FeedError> for Error {
    /// Converts [`FeedError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: FeedError) -> Error {
        Error::Feed(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
