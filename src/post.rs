//! Defines the [`Post`] type and the logic for loading the post collection
//! from the file system into memory. Each source file is YAML frontmatter
//! between `---` fences followed by a markdown body; the loaded collection
//! is ordered by date, most recent first, and is never reordered afterwards.

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

use pulldown_cmark::{html, Options, Parser};
use serde::Deserialize;
use url::Url;

use crate::filter::Tagged;
use crate::tag::Tag;

/// A single content entry. Everything except `tags` is opaque payload as
/// far as filtering is concerned and flows through to presentation and the
/// feed untouched.
#[derive(Clone, Debug)]
pub struct Post {
    /// The post's identifier: its slugified path relative to the posts
    /// source directory, without the extension.
    pub id: String,

    /// The post's permalink, `{posts_base_url}/{id}.html`.
    pub url: Url,

    pub title: String,

    /// The publication date as an ISO-8601 `YYYY-MM-DD` string. Kept as a
    /// string so collection ordering is a plain lexicographic comparison;
    /// only the feed parses it into a real date.
    pub date: String,

    pub description: String,

    pub author: String,

    /// Optional cover image.
    pub image: Option<Image>,

    /// The post's tags, frontmatter casing preserved. A post with no `tags`
    /// key gets the empty list.
    pub tags: Vec<Tag>,

    /// The body rendered to HTML.
    pub body: String,
}

/// A cover image reference from frontmatter.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Image {
    pub url: String,
    pub alt: String,
}

#[derive(Deserialize)]
struct Frontmatter {
    title: String,

    date: String,

    #[serde(default)]
    description: String,

    #[serde(default)]
    author: String,

    #[serde(default)]
    image: Option<Image>,

    #[serde(default)]
    tags: Vec<String>,
}

impl Post {
    /// Parses a single [`Post`] from an `id` and the source file contents.
    /// The source must be structured as follows:
    ///
    /// 1. Initial frontmatter fence (`---`)
    /// 2. YAML frontmatter with fields `title` and `date`, and optionally
    ///    `description`, `author`, `image`, and `tags`
    /// 3. Terminal frontmatter fence (`---`)
    /// 4. Markdown body
    ///
    /// For example:
    ///
    /// ```md
    /// ---
    /// title: Hello, world!
    /// date: 2024-04-16
    /// tags: [greet]
    /// ---
    /// # Hello
    ///
    /// World
    /// ```
    pub fn from_str(
        id: &str,
        input: &str,
        posts_base_url: &Url,
        tags_base_url: &Url,
    ) -> Result<Post> {
        fn frontmatter_indices(input: &str) -> Result<(usize, usize, usize)> {
            const FENCE: &str = "---";
            if !input.starts_with(FENCE) {
                return Err(Error::FrontmatterMissingStartFence);
            }
            match input[FENCE.len()..].find("---") {
                None => Err(Error::FrontmatterMissingEndFence),
                Some(offset) => Ok((
                    FENCE.len(),                        // yaml_start
                    FENCE.len() + offset,               // yaml_stop
                    FENCE.len() + offset + FENCE.len(), // body_start
                )),
            }
        }

        let (yaml_start, yaml_stop, body_start) = frontmatter_indices(input)?;
        let frontmatter: Frontmatter = serde_yaml::from_str(&input[yaml_start..yaml_stop])?;

        let mut body = String::new();
        html::push_html(
            &mut body,
            Parser::new_ext(&input[body_start..], markdown_options()),
        );

        Ok(Post {
            id: id.to_owned(),
            url: posts_base_url.join(&format!("{}.html", id))?,
            title: frontmatter.title,
            date: frontmatter.date,
            description: frontmatter.description,
            author: frontmatter.author,
            image: frontmatter.image,
            tags: frontmatter
                .tags
                .iter()
                .map(|label| Tag::new(label, tags_base_url))
                .collect(),
            body,
        })
    }

    /// Returns the body up to the fold marker and whether the body was
    /// actually folded. The listing and the feed show the folded summary;
    /// the post page shows everything.
    pub fn summary(&self) -> (&str, bool) {
        const FOLD_TAG: &str = "<!-- more -->";
        match self.body.find(FOLD_TAG) {
            Some(i) => (&self.body[..i], true),
            None => (&self.body, false),
        }
    }
}

impl Tagged for Post {
    fn tags(&self) -> &[Tag] {
        &self.tags
    }
}

fn markdown_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

const MARKDOWN_EXTENSION: &str = "md";

/// Walks `source_directory` for post files (extension = `.md`) and returns
/// the collection sorted by date (most recent first). Nested directories
/// are allowed; a file at `{source_directory}/notes/foo bar.md` gets the id
/// `notes/foo-bar`.
pub fn parse_posts(
    source_directory: &Path,
    posts_base_url: &Url,
    tags_base_url: &Url,
) -> Result<Vec<Post>> {
    let mut posts = Vec::new();
    for result in walkdir::WalkDir::new(source_directory) {
        let entry = result?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(MARKDOWN_EXTENSION) {
            continue;
        }
        // strip_prefix should never fail; walkdir only yields descendants
        let relative = path.strip_prefix(source_directory).unwrap();
        posts.push(parse_post(path, relative, posts_base_url, tags_base_url)?);
    }

    posts.sort_by(|a, b| b.date.cmp(&a.date));

    Ok(posts)
}

fn parse_post(
    path: &Path,
    relative: &Path,
    posts_base_url: &Url,
    tags_base_url: &Url,
) -> Result<Post> {
    match read_post(path, relative, posts_base_url, tags_base_url) {
        Ok(post) => Ok(post),
        Err(e) => Err(Error::Annotated(
            format!("parsing post `{}`", path.display()),
            Box::new(e),
        )),
    }
}

fn read_post(
    path: &Path,
    relative: &Path,
    posts_base_url: &Url,
    tags_base_url: &Url,
) -> Result<Post> {
    use std::io::Read;
    let mut contents = String::new();
    File::open(path)?.read_to_string(&mut contents)?;
    Post::from_str(&post_id(relative)?, &contents, posts_base_url, tags_base_url)
}

// The id is the slugified relative path, one segment per directory level,
// extension dropped.
fn post_id(relative: &Path) -> Result<String> {
    let mut segments = Vec::new();
    for component in relative.with_extension("").components() {
        let segment = component
            .as_os_str()
            .to_str()
            .ok_or_else(|| Error::InvalidFileName(relative.to_owned()))?;
        segments.push(slug::slugify(segment));
    }
    Ok(segments.join("/"))
}

/// Represents the result of a [`Post`]-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing a [`Post`] object.
#[derive(Debug)]
pub enum Error {
    /// Returned when a post source file is missing its starting frontmatter
    /// fence (`---`).
    FrontmatterMissingStartFence,

    /// Returned when a post source file is missing its terminal frontmatter
    /// fence (`---` i.e., the starting fence was found but the ending one
    /// was missing).
    FrontmatterMissingEndFence,

    /// Returned when there was an error parsing the frontmatter as YAML.
    DeserializeYaml(serde_yaml::Error),

    /// Returned when there is a problem parsing URLs.
    UrlParse(url::ParseError),

    /// Returned when a source file's name isn't valid UTF-8.
    InvalidFileName(PathBuf),

    /// Returned for other I/O errors.
    Io(std::io::Error),

    /// Returned for WalkDir I/O errors.
    WalkDir(walkdir::Error),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::FrontmatterMissingStartFence => {
                write!(f, "Post must begin with `---`")
            }
            Error::FrontmatterMissingEndFence => {
                write!(f, "Missing closing `---`")
            }
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::UrlParse(err) => err.fmt(f),
            Error::InvalidFileName(path) => {
                write!(f, "invalid file name: {:?}", path)
            }
            Error::Io(err) => err.fmt(f),
            Error::WalkDir(err) => err.fmt(f),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FrontmatterMissingStartFence => None,
            Error::FrontmatterMissingEndFence => None,
            Error::DeserializeYaml(err) => Some(err),
            Error::UrlParse(err) => Some(err),
            Error::InvalidFileName(_) => None,
            Error::Io(err) => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<url::ParseError> for Error {
    /// Converts a [`url::ParseError`] into an [`Error`]. It allows us to use
    /// the `?` operator for URL parsing and joining functions.
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for fallible I/O functions.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use super::*;

    fn posts_url() -> Url {
        Url::parse("https://example.org/posts/").unwrap()
    }

    fn tags_url() -> Url {
        Url::parse("https://example.org/blog/tags/").unwrap()
    }

    #[test]
    fn test_from_str_full_frontmatter() -> Result<()> {
        let input = "---\n\
                     title: Hello, world!\n\
                     date: 2024-04-16\n\
                     description: A greeting.\n\
                     author: R. Kornel\n\
                     image:\n\
                     \x20 url: /images/hello.png\n\
                     \x20 alt: a waving hand\n\
                     tags: [Greetings, meta]\n\
                     ---\n\
                     # Hello\n\nWorld\n";
        let post = Post::from_str("hello-world", input, &posts_url(), &tags_url())?;

        assert_eq!(post.id, "hello-world");
        assert_eq!(
            post.url.as_str(),
            "https://example.org/posts/hello-world.html"
        );
        assert_eq!(post.title, "Hello, world!");
        assert_eq!(post.date, "2024-04-16");
        assert_eq!(post.description, "A greeting.");
        assert_eq!(post.author, "R. Kornel");
        assert_eq!(
            post.image,
            Some(Image {
                url: "/images/hello.png".to_owned(),
                alt: "a waving hand".to_owned(),
            })
        );
        let labels: Vec<&str> = post.tags.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["Greetings", "meta"]);
        assert!(post.body.contains("<h1>Hello</h1>"));
        Ok(())
    }

    #[test]
    fn test_from_str_missing_tags_is_empty_list() -> Result<()> {
        let input = "---\ntitle: Bare\ndate: 2024-01-01\n---\nBody\n";
        let post = Post::from_str("bare", input, &posts_url(), &tags_url())?;
        assert!(post.tags.is_empty());
        Ok(())
    }

    #[test]
    fn test_from_str_missing_start_fence() {
        let input = "title: Nope\n---\nBody\n";
        match Post::from_str("nope", input, &posts_url(), &tags_url()) {
            Err(Error::FrontmatterMissingStartFence) => {}
            other => panic!("unexpected result: {:?}", other.map(|p| p.id)),
        }
    }

    #[test]
    fn test_from_str_missing_end_fence() {
        let input = "---\ntitle: Nope\ndate: 2024-01-01\nBody\n";
        match Post::from_str("nope", input, &posts_url(), &tags_url()) {
            Err(Error::FrontmatterMissingEndFence) => {}
            other => panic!("unexpected result: {:?}", other.map(|p| p.id)),
        }
    }

    #[test]
    fn test_summary_folds_at_marker() -> Result<()> {
        let input =
            "---\ntitle: Folded\ndate: 2024-01-01\n---\nAbove the fold.\n\n<!-- more -->\n\nBelow.\n";
        let post = Post::from_str("folded", input, &posts_url(), &tags_url())?;

        let (summary, folded) = post.summary();
        assert!(folded);
        assert!(summary.contains("Above the fold."));
        assert!(!summary.contains("Below."));

        let unfolded = Post::from_str(
            "plain",
            "---\ntitle: Plain\ndate: 2024-01-01\n---\nAll of it.\n",
            &posts_url(),
            &tags_url(),
        )?;
        let (summary, folded) = unfolded.summary();
        assert!(!folded);
        assert!(summary.contains("All of it."));
        Ok(())
    }

    #[test]
    fn test_parse_posts_sorts_by_date_descending() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let write = |name: &str, title: &str, date: &str| -> std::io::Result<()> {
            let mut file = File::create(dir.path().join(name))?;
            write!(
                file,
                "---\ntitle: {}\ndate: {}\ntags: [notes]\n---\nBody\n",
                title, date
            )
        };
        write("older.md", "Older", "2023-06-01")?;
        write("newest.md", "Newest", "2024-02-20")?;
        std::fs::create_dir(dir.path().join("drafts"))?;
        write("drafts/middle one.md", "Middle", "2023-12-31")?;

        let posts = parse_posts(dir.path(), &posts_url(), &tags_url())?;
        let titles: Vec<&str> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Newest", "Middle", "Older"]);
        assert_eq!(posts[1].id, "drafts/middle-one");
        assert_eq!(
            posts[1].url.as_str(),
            "https://example.org/posts/drafts/middle-one.html"
        );
        Ok(())
    }

    #[test]
    fn test_parse_posts_ignores_other_extensions() -> Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("notes.txt"), "not a post")?;
        std::fs::write(
            dir.path().join("real.md"),
            "---\ntitle: Real\ndate: 2024-01-01\n---\nBody\n",
        )?;

        let posts = parse_posts(dir.path(), &posts_url(), &tags_url())?;
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "Real");
        Ok(())
    }
}
