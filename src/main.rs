mod preview;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use glance_application::{GlancePanel, PointerInput};
use glance_config::{ConfigService, MinimapConfig};
use glance_document::{Document, EditorView};
use glance_render::{DocumentModel, PointerButton, PointerEvent, RenderOutcome, ScrollHost};
use glance_syntax::SyntaxSystem;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "codeglance")]
#[command(about = "Print a minimap of a source file")]
#[command(version)]
struct Cli {
    /// File to render
    file: PathBuf,

    /// Minimap settings file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Collapse lines FIRST:LAST (zero based, inclusive); may be repeated
    #[arg(long = "fold", value_parser = parse_fold)]
    folds: Vec<(usize, usize)>,

    /// Editor scroll offset in pixels
    #[arg(long, default_value_t = 0)]
    scroll: i32,

    /// Editor viewport height in pixels
    #[arg(long, default_value_t = 800)]
    height: i32,

    /// Width of the editor window in pixels
    #[arg(long, default_value_t = 1200)]
    window_width: u32,

    /// Editor line height in pixels
    #[arg(long, default_value_t = 16.0)]
    line_height: f32,

    /// Click the minimap at this panel row before printing
    #[arg(long)]
    click: Option<i32>,

    /// Render on a worker thread
    #[arg(long)]
    background: bool,

    /// Write the effective settings to this file
    #[arg(long)]
    save_config: Option<PathBuf>,
}

fn parse_fold(value: &str) -> Result<(usize, usize), String> {
    let (first, last) = value
        .split_once(':')
        .ok_or_else(|| format!("expected FIRST:LAST, got {value:?}"))?;
    let first = first.trim().parse().map_err(|err| format!("bad first line: {err}"))?;
    let last = last.trim().parse().map_err(|err| format!("bad last line: {err}"))?;
    if last <= first {
        return Err(format!("fold {first}:{last} hides no lines"));
    }
    Ok((first, last))
}

/// Used when `RUST_LOG` is unset; truncated renders warn.
fn fallback_filter() -> EnvFilter {
    EnvFilter::new("warn")
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback_filter()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if cli.line_height <= 0.0 {
        bail!("line height must be positive");
    }

    let config = match &cli.config {
        Some(path) => MinimapConfig::load_or_default(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?,
        None => MinimapConfig::default(),
    };
    if let Some(path) = &cli.save_config {
        config
            .save(path)
            .with_context(|| format!("failed to write settings to {}", path.display()))?;
    }
    tracing::debug!("using {}", config);

    let mut document = Document::from_path(&cli.file)
        .with_context(|| format!("failed to open {}", cli.file.display()))?;
    for (first, last) in &cli.folds {
        document
            .collapse_lines(*first, *last)
            .with_context(|| format!("cannot fold lines {first}:{last}"))?;
    }

    let service = Arc::new(ConfigService::new(config));
    let panel = GlancePanel::new(Arc::clone(&service));

    let config = service.snapshot();
    if !panel.is_visible(document.line_count(), cli.window_width) {
        println!("{}: minimap hidden by configuration", document.display_name());
        return Ok(());
    }

    let mut view = EditorView::for_document(&document, cli.line_height, cli.height);
    view.scroll_vertically(cli.scroll);

    let syntax = SyntaxSystem::new();
    let spans = syntax.spans(document.text(), document.language());
    tracing::debug!("{} spans for {}", spans.len(), document.language());

    panel.sync_geometry(&view.metrics(), view.visible_area());
    if let Some(row) = cli.click {
        // Away from the resize gutter on either side.
        let x = config.width as i32 / 2;
        let event = PointerEvent::new(x, row, x).with_button(PointerButton::Primary);
        panel.handle_pointer(PointerInput::Press(event), &mut view);
        panel.handle_pointer(PointerInput::Release(event), &mut view);
        panel.sync_geometry(&view.metrics(), view.visible_area());
    }

    let metrics = view.metrics();
    let outcome = if cli.background {
        panel
            .spawn_render(Arc::new(document.clone()), spans, metrics)
            .wait()
    } else {
        panel.render(&document, &spans, &metrics)
    };
    if let RenderOutcome::Truncated { offset } = outcome {
        tracing::warn!("minimap stopped at byte {}", offset);
    }

    let scroll = panel.scroll_state();
    let indicator = panel.indicator();
    let rows = panel.visible_rows();
    let lines = panel.with_image(|image| preview::shade(image, rows, config.width, &indicator));

    println!(
        "{} ({}, {} lines, {} visible)",
        document.display_name(),
        document.language(),
        document.line_count(),
        document.visible_line_count()
    );
    for line in lines {
        println!("{line}");
    }
    println!(
        "scale {:.3}  document {}x{}  window {}..{}  viewport {}+{}  scroll {}",
        scroll.scale(),
        scroll.document_width(),
        scroll.document_height(),
        scroll.visible_start(),
        scroll.visible_end(),
        scroll.viewport_start(),
        scroll.viewport_height(),
        view.scroll_y()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fold_ranges() {
        assert_eq!(parse_fold("3:10"), Ok((3, 10)));
        assert_eq!(parse_fold(" 0 : 1 "), Ok((0, 1)));
        assert!(parse_fold("5").is_err());
        assert!(parse_fold("5:5").is_err());
        assert!(parse_fold("a:9").is_err());
    }

    #[test]
    fn warnings_are_shown_without_rust_log() {
        assert_eq!(fallback_filter().to_string(), "warn");
    }

    #[test]
    fn cli_accepts_repeated_folds() {
        let cli = Cli::try_parse_from(["codeglance", "main.rs", "--fold", "1:4", "--fold", "8:9"]).unwrap();
        assert_eq!(cli.folds, vec![(1, 4), (8, 9)]);
        assert_eq!(cli.height, 800);
        assert!(!cli.background);
    }
}
