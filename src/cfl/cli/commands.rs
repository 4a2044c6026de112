//! # CLI Layer
//!
//! The only place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr, stdin)
//! - Initializes logging
//! - Turns a parsed command line into an API call and rendered output
//!
//! Data goes to stdout. Messages go to stdout as well, except in JSON mode where
//! they move to stderr so stdout stays parseable.

use super::complete::write_completions;
use super::render::Renderer;
use super::setup::{
    AttachmentCommands, BodyArgs, Cli, Commands, ConfigCommands, OutputFormat, PageCommands,
    SearchArgs, SpaceCommands,
};
use cfl::api::{self, CflApi, CmdResult, ConfigAction};
use cfl::client::http::HttpClient;
use cfl::config::{config_dir, CflConfig};
use cfl::error::{CflError, Result};
use cfl::query::SearchFilter;
use clap::Parser;
use log::debug;
use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

const MORE_RESULTS_NOTICE: &str = "More results available; increase --limit to see more.";

struct AppContext {
    config_dir: PathBuf,
    renderer: Renderer,
}

impl AppContext {
    /// Builds the remote API from resolved configuration.
    ///
    /// Deferred until a command needs it, so `config`, `init` and `completion`
    /// work before any connection is configured.
    fn api(&self) -> Result<CflApi<HttpClient>> {
        let config = CflConfig::resolve(&self.config_dir)?;
        let client = HttpClient::new(&config)?;
        Ok(CflApi::new(client, config.default_space))
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Commands::Completion { shell } = &cli.command {
        write_completions(*shell, &mut io::stdout());
        return Ok(());
    }

    let use_color =
        !cli.no_color && cli.output == OutputFormat::Table && console::colors_enabled();
    let ctx = AppContext {
        config_dir: config_dir()?,
        renderer: Renderer::new(cli.output, use_color),
    };
    debug!("config directory: {}", ctx.config_dir.display());

    match cli.command {
        Commands::Search(args) => handle_search(&ctx, args),
        Commands::Space { command } => handle_space(&ctx, command),
        Commands::Page { command } => handle_page(&ctx, command),
        Commands::Attachment { command } => handle_attachment(&ctx, command),
        Commands::Config { command } => handle_config(&ctx, command),
        Commands::Init {
            url,
            email,
            api_token,
            default_space,
        } => {
            let mut config = CflConfig {
                email,
                api_token,
                default_space,
                ..CflConfig::default()
            };
            config.set("url", &url)?;
            let result = api::init(&ctx.config_dir, config)?;
            print_messages(&ctx, &result)
        }
        Commands::Completion { .. } => Ok(()),
    }
}

/// `RUST_LOG` wins when set; otherwise `-v` selects debug and the default is warn.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn handle_search(ctx: &AppContext, args: SearchArgs) -> Result<()> {
    let filter = SearchFilter {
        free_text: (!args.text.is_empty()).then(|| args.text.join(" ")),
        raw_query: args.cql,
        space: args.space,
        content_type: args.content_type,
        title: args.title,
        label: args.label,
        limit: args.limit,
    };

    // Filter mistakes are reported before configuration is even looked at.
    cfl::query::compile(&filter)?;

    let result = ctx.api()?.search(&filter)?;
    if let Some(hits) = &result.hits {
        print_out(&ctx.renderer.hits(hits.items())?);
    }
    finish(ctx, &result)
}

fn handle_space(ctx: &AppContext, command: SpaceCommands) -> Result<()> {
    let result = match command {
        SpaceCommands::List { limit } => ctx.api()?.list_spaces(limit)?,
        SpaceCommands::View { key } => ctx.api()?.view_space(&key)?,
    };
    if let Some(spaces) = &result.spaces {
        print_out(&ctx.renderer.spaces(spaces.items())?);
    }
    finish(ctx, &result)
}

fn handle_page(ctx: &AppContext, command: PageCommands) -> Result<()> {
    let result = match command {
        PageCommands::List { space, limit } => {
            let result = ctx.api()?.list_pages(space.as_deref(), limit)?;
            if let Some(pages) = &result.pages {
                print_out(&ctx.renderer.pages(pages.items())?);
            }
            result
        }
        PageCommands::View { id, raw } => {
            let result = ctx.api()?.view_page(&id)?;
            for page in result.pages.iter().flat_map(|p| p.items()) {
                print_out(&ctx.renderer.page(page, raw)?);
            }
            result
        }
        PageCommands::Create {
            title,
            space,
            parent,
            body,
        } => {
            let api = ctx.api()?;
            let content = read_body(&body)?.unwrap_or_default();
            let result =
                api.create_page(space.as_deref(), &title, &content, parent.as_deref())?;
            print_out(&ctx.renderer.pages(&result.affected_pages)?);
            result
        }
        PageCommands::Edit { id, title, body } => {
            let api = ctx.api()?;
            let content = read_body(&body)?;
            let result = api.update_page(&id, title.as_deref(), content.as_deref())?;
            print_out(&ctx.renderer.pages(&result.affected_pages)?);
            result
        }
        PageCommands::Delete { id, force } => {
            let api = ctx.api()?;
            if !confirm(&format!("Delete page {}?", id), force)? {
                eprintln!("Aborted.");
                return Ok(());
            }
            api.delete_page(&id)?
        }
    };
    finish(ctx, &result)
}

fn handle_attachment(ctx: &AppContext, command: AttachmentCommands) -> Result<()> {
    let result = match command {
        AttachmentCommands::List {
            page_id,
            unused,
            limit,
        } => {
            let result = ctx.api()?.list_attachments(&page_id, limit, unused)?;
            if let Some(attachments) = &result.attachments {
                print_out(&ctx.renderer.attachments(attachments.items())?);
            }
            result
        }
        AttachmentCommands::Upload { page_id, files } => {
            let result = ctx.api()?.upload_attachments(&page_id, &files)?;
            print_out(&ctx.renderer.attachments(&result.affected_attachments)?);
            result
        }
        AttachmentCommands::Download {
            page_id,
            attachment,
            dir,
        } => {
            let result = ctx.api()?.download_attachment(&page_id, &attachment, &dir)?;
            print_out(&ctx.renderer.saved_files(&result.saved_files)?);
            result
        }
        AttachmentCommands::Delete { id, force } => {
            let api = ctx.api()?;
            if !confirm(&format!("Delete attachment {}?", id), force)? {
                eprintln!("Aborted.");
                return Ok(());
            }
            api.delete_attachment(&id)?
        }
    };
    finish(ctx, &result)
}

fn handle_config(ctx: &AppContext, command: Option<ConfigCommands>) -> Result<()> {
    let action = match command {
        None | Some(ConfigCommands::Show) => ConfigAction::ShowAll,
        Some(ConfigCommands::Get { key }) => ConfigAction::ShowKey(key),
        Some(ConfigCommands::Set { key, value }) => ConfigAction::Set(key, value),
        Some(ConfigCommands::Path) => ConfigAction::Path,
    };
    let show_path = matches!(action, ConfigAction::Path);
    let show_all = matches!(action, ConfigAction::ShowAll);

    let result = api::config(&ctx.config_dir, action)?;

    if show_all {
        if let Some(config) = &result.config {
            print_out(&ctx.renderer.settings(&config.list_all())?);
        }
    } else if show_path {
        if let Some(path) = &result.config_path {
            print_out(&ctx.renderer.path(path)?);
        }
    } else if let Some(value) = &result.value {
        print_out(&ctx.renderer.value(value)?);
    }
    print_messages(ctx, &result)
}

/// Messages, then the has-more notice for truncated listings.
fn finish(ctx: &AppContext, result: &CmdResult) -> Result<()> {
    print_messages(ctx, result)?;
    write_more_results_notice(&mut io::stderr(), ctx.renderer.format(), result)?;
    Ok(())
}

/// Tells a human reader the listing was cut short. JSON output stays silent.
fn write_more_results_notice<W: Write>(
    out: &mut W,
    format: OutputFormat,
    result: &CmdResult,
) -> io::Result<()> {
    if result.has_more() && !format.is_machine_readable() {
        writeln!(out, "{}", MORE_RESULTS_NOTICE)?;
    }
    Ok(())
}

fn print_messages(ctx: &AppContext, result: &CmdResult) -> Result<()> {
    let rendered = ctx.renderer.messages(&result.messages)?;
    if rendered.is_empty() {
        return Ok(());
    }
    if ctx.renderer.format().is_machine_readable() {
        eprint!("{}", rendered);
    } else {
        print_out(&rendered);
    }
    Ok(())
}

fn print_out(text: &str) {
    print!("{}", text);
}

/// Body text from `--body`, `--file`, or piped stdin, in that order.
fn read_body(args: &BodyArgs) -> Result<Option<String>> {
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    read_body_from(args, interactive, stdin.lock())
}

/// Returns `None` when no source is given and stdin is a terminal, or when
/// stdin holds nothing but whitespace. Cron jobs and CI runners hand over an
/// empty stdin, and that must not count as a replacement body.
fn read_body_from<R: Read>(
    args: &BodyArgs,
    stdin_is_terminal: bool,
    mut stdin: R,
) -> Result<Option<String>> {
    if let Some(body) = &args.body {
        return Ok(Some(body.clone()));
    }
    if let Some(path) = &args.file {
        return read_body_file(path).map(Some);
    }
    if stdin_is_terminal {
        return Ok(None);
    }
    let mut buffer = String::new();
    stdin.read_to_string(&mut buffer)?;
    debug!("read {} bytes of body from stdin", buffer.len());
    if buffer.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(buffer))
}

fn read_body_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        CflError::validation(format!("cannot read body file {}: {}", path.display(), e))
    })
}

/// Asks on stderr for a yes/no answer. `force` answers yes without asking.
///
/// Refuses to guess when stdin is not interactive.
fn confirm(prompt: &str, force: bool) -> Result<bool> {
    if force {
        return Ok(true);
    }
    if !io::stdin().is_terminal() {
        return Err(CflError::validation(
            "refusing to delete without confirmation; pass --force in non-interactive use",
        ));
    }

    eprint!("{} [y/N] ", prompt);
    io::stderr().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfl::client::memory::MemoryClient;
    use cfl::commands::{pages, spaces};

    #[test]
    fn yes_answers() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes("\n"));
        assert!(!is_yes("no"));
    }

    #[test]
    fn force_skips_prompt() {
        assert!(confirm("Delete?", true).unwrap());
    }

    #[test]
    fn body_flag_wins_over_file() {
        let args = BodyArgs {
            body: Some("<p>inline</p>".into()),
            file: Some(PathBuf::from("/nonexistent")),
        };
        assert_eq!(read_body(&args).unwrap().as_deref(), Some("<p>inline</p>"));
    }

    #[test]
    fn body_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("body.html");
        std::fs::write(&path, "<p>from file</p>").unwrap();
        let args = BodyArgs {
            body: None,
            file: Some(path),
        };
        assert_eq!(
            read_body(&args).unwrap().as_deref(),
            Some("<p>from file</p>")
        );
    }

    #[test]
    fn empty_stdin_is_no_body() {
        let args = BodyArgs::default();
        assert_eq!(read_body_from(&args, false, io::empty()).unwrap(), None);
        assert_eq!(
            read_body_from(&args, false, " \n\t\n".as_bytes()).unwrap(),
            None
        );
    }

    #[test]
    fn piped_stdin_is_the_body() {
        let args = BodyArgs::default();
        assert_eq!(
            read_body_from(&args, false, "<p>piped</p>\n".as_bytes())
                .unwrap()
                .as_deref(),
            Some("<p>piped</p>\n")
        );
    }

    #[test]
    fn terminal_stdin_is_not_read() {
        let args = BodyArgs::default();
        assert_eq!(
            read_body_from(&args, true, "<p>ignored</p>".as_bytes()).unwrap(),
            None
        );
    }

    #[test]
    fn explicit_empty_body_is_kept() {
        let args = BodyArgs {
            body: Some(String::new()),
            file: None,
        };
        assert_eq!(
            read_body_from(&args, false, io::empty()).unwrap().as_deref(),
            Some("")
        );
    }

    #[test]
    fn title_only_edit_with_empty_stdin_keeps_body() {
        let client = MemoryClient::new()
            .with_space("10", "DEV", "Development")
            .with_page("101", "10", "Runbook", "<p>important steps</p>");

        let body = read_body_from(&BodyArgs::default(), false, io::empty()).unwrap();
        pages::update(&client, "101", Some("New"), body.as_deref()).unwrap();

        let page = client.page("101").unwrap();
        assert_eq!(page.title, "New");
        assert_eq!(page.storage(), "<p>important steps</p>");
    }

    fn truncated_listing() -> CmdResult {
        let client = MemoryClient::new()
            .with_space("1", "DEV", "Development")
            .with_space("2", "OPS", "Operations")
            .with_space("3", "HR", "People");
        spaces::list(&client, 1).unwrap()
    }

    fn notice_for(format: OutputFormat, result: &CmdResult) -> String {
        let mut out = Vec::new();
        write_more_results_notice(&mut out, format, result).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn more_results_notice_for_human_formats() {
        let result = truncated_listing();
        assert!(result.has_more());
        for format in [OutputFormat::Table, OutputFormat::Plain] {
            assert_eq!(
                notice_for(format, &result),
                format!("{}\n", MORE_RESULTS_NOTICE)
            );
        }
    }

    #[test]
    fn json_output_has_no_more_results_notice() {
        assert_eq!(notice_for(OutputFormat::Json, &truncated_listing()), "");
    }

    #[test]
    fn complete_listing_has_no_notice() {
        let client = MemoryClient::new().with_space("1", "DEV", "Development");
        let result = spaces::list(&client, 10).unwrap();
        assert_eq!(notice_for(OutputFormat::Table, &result), "");
    }

    #[test]
    fn missing_body_file_is_validation_error() {
        let args = BodyArgs {
            body: None,
            file: Some(PathBuf::from("/definitely/not/here.html")),
        };
        assert!(read_body(&args).unwrap_err().is_validation());
    }
}
