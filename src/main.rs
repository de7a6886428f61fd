use std::path::Path;

use anyhow::Context;
use clap::{App, AppSettings, Arg, SubCommand};

use stanza::build::build_site;
use stanza::config::Config;
use stanza::filter::TagFilter;
use stanza::post::parse_posts;
use stanza::tag::available_tags;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let matches = App::new("stanza")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Content engine for a personal website")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("build")
                .about("Build the site outputs: stylesheet, static assets, and feed")
                .arg(
                    Arg::with_name("project-dir")
                        .long("project-dir")
                        .help("Directory to search (upwards) for stanza.yaml")
                        .takes_value(true)
                        .default_value("."),
                )
                .arg(
                    Arg::with_name("output")
                        .long("output")
                        .short("o")
                        .help("Output directory")
                        .takes_value(true)
                        .default_value("_site"),
                ),
        )
        .subcommand(
            SubCommand::with_name("list")
                .about("List posts, optionally narrowed by tags (every tag must match)")
                .arg(
                    Arg::with_name("project-dir")
                        .long("project-dir")
                        .help("Directory to search (upwards) for stanza.yaml")
                        .takes_value(true)
                        .default_value("."),
                )
                .arg(
                    Arg::with_name("tag")
                        .long("tag")
                        .short("t")
                        .help("Toggle a tag on the listing filter (repeatable)")
                        .takes_value(true)
                        .multiple(true),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        ("build", Some(sub)) => {
            let config = load_config(sub.value_of("project-dir"), sub.value_of("output"))?;
            build_site(config).context("building site")?;
        }
        ("list", Some(sub)) => {
            let config = load_config(sub.value_of("project-dir"), None)?;
            let posts = parse_posts(
                &config.posts_source_directory,
                &config.posts_url,
                &config.tags_url,
            )?;

            let mut filter = TagFilter::new(&posts, available_tags(&posts));
            if let Some(tags) = sub.values_of("tag") {
                for tag in tags {
                    filter.toggle_tag(tag);
                }
            }

            println!("SHOWING {} OF {} POSTS", filter.visible().len(), filter.total());
            for post in filter.visible() {
                let labels: Vec<&str> = post.tags.iter().map(|t| t.label.as_str()).collect();
                println!("{}  {}  [{}]", post.date, post.title, labels.join(", "));
            }
        }
        _ => unreachable!("SubcommandRequiredElseHelp"),
    }

    Ok(())
}

fn load_config(project_dir: Option<&str>, output: Option<&str>) -> anyhow::Result<Config> {
    Config::from_directory(
        Path::new(project_dir.unwrap_or(".")),
        Path::new(output.unwrap_or("_site")),
    )
}
