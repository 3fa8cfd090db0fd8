use anyhow::{Context, Result, bail};
use mailblocks_config::{Config, StyleDefaults};
use mailblocks_engine::{
    BlockType, Document, EditorSession, GlobalStyles, check_save_gate, compile, io, lint,
};
use std::{
    env,
    path::{Path, PathBuf},
    process,
};

fn usage(program: &str) {
    eprintln!("Usage:");
    eprintln!("  {program} compile <document.json> [output.html]");
    eprintln!("  {program} check <document.json>");
    eprintln!("  {program} new <document.json>");
    eprintln!("  {program} build");
    eprintln!("  {program} init <templates-folder-path>");
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("mailblocks-cli");

    match args.get(1).map(String::as_str) {
        Some("compile") if args.len() == 3 || args.len() == 4 => {
            compile_command(Path::new(&args[2]), args.get(3).map(Path::new))
        }
        Some("check") if args.len() == 3 => {
            if !check_command(Path::new(&args[2]))? {
                process::exit(1);
            }
            Ok(())
        }
        Some("new") if args.len() == 3 => new_command(Path::new(&args[2])),
        Some("build") if args.len() == 2 => build_command(),
        Some("init") if args.len() == 3 => init_command(Path::new(&args[2])),
        _ => {
            usage(program);
            process::exit(1);
        }
    }
}

fn compile_command(input: &Path, output: Option<&Path>) -> Result<()> {
    let document = io::load_document(input)?;
    let html = compile(&document);

    match output {
        Some(output) => {
            io::write_file(output, &html)?;
            log::info!("Compiled {} -> {}", input.display(), output.display());
        }
        None => print!("{html}"),
    }
    Ok(())
}

/// Returns false when the document would be refused on save
fn check_command(input: &Path) -> Result<bool> {
    let document = io::load_document(input)?;

    for issue in lint(&document) {
        log::warn!("{}: {issue}", input.display());
    }

    match check_save_gate(&document) {
        Ok(()) => {
            log::info!("{}: ok", input.display());
            Ok(true)
        }
        Err(e) => {
            eprintln!("Error: {}: {e}", input.display());
            Ok(false)
        }
    }
}

fn new_command(output: &Path) -> Result<()> {
    if output.exists() {
        bail!("Refusing to overwrite existing file {}", output.display());
    }

    let styles = match Config::load() {
        Ok(Some(config)) => config.styles,
        Ok(None) => StyleDefaults::default(),
        Err(e) => {
            log::warn!("Ignoring unreadable config: {e}");
            StyleDefaults::default()
        }
    };

    let document = starter_document(&styles)?;
    io::save_document(output, &document)?;
    log::info!("Created {}", output.display());
    Ok(())
}

fn build_command() -> Result<()> {
    let config_path = Config::config_path();
    let config = match Config::load() {
        Ok(Some(config)) => config,
        Ok(None) => {
            eprintln!("Error: No config file found");
            eprintln!("Run `mailblocks-cli init <templates-folder-path>` to create one");
            eprintln!("Or create {} with templates_path set", config_path.display());
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let output_dir = config.output_dir();
    let documents = io::scan_documents(&config.templates_path).with_context(|| {
        format!(
            "Invalid templates path '{}' from config file '{}'",
            config.templates_path.display(),
            config_path.display()
        )
    })?;

    let mut failures = 0;
    for path in &documents {
        let target = output_path_for(path, &config.templates_path, &output_dir);
        match io::load_document(path) {
            Ok(document) => {
                if let Err(e) = check_save_gate(&document) {
                    log::warn!("{}: {e}", path.display());
                }
                io::write_file(&target, &compile(&document))?;
                log::info!("Compiled {} -> {}", path.display(), target.display());
            }
            Err(e) => {
                log::error!("Skipping {e}");
                failures += 1;
            }
        }
    }

    log::info!(
        "Built {} of {} documents into {}",
        documents.len() - failures,
        documents.len(),
        output_dir.display()
    );
    if failures > 0 {
        process::exit(1);
    }
    Ok(())
}

fn init_command(templates_path: &Path) -> Result<()> {
    let config_path = Config::config_path();
    if config_path.exists() {
        bail!("Config file already exists at {}", config_path.display());
    }

    let config = config_for(templates_path)?;
    config.save()?;
    log::info!(
        "Config saved to {} with templates path {}",
        config_path.display(),
        config.templates_path.display()
    );
    Ok(())
}

/// Config pointing at an existing templates folder, stored as an absolute path
fn config_for(templates_path: &Path) -> Result<Config> {
    io::validate_templates_dir(templates_path)?;
    let templates_path = templates_path
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", templates_path.display()))?;
    Ok(Config::new(templates_path))
}

/// Heading, text, button and footer on top of the configured style defaults
fn starter_document(defaults: &StyleDefaults) -> Result<Document> {
    let mut session = EditorSession::from_document(Document::with_styles(global_styles(defaults)));
    for kind in [
        BlockType::Heading,
        BlockType::Text,
        BlockType::Button,
        BlockType::Footer,
    ] {
        session.add_block(kind, None)?;
    }
    Ok(session.document().clone())
}

fn global_styles(defaults: &StyleDefaults) -> GlobalStyles {
    let mut styles = GlobalStyles::default();
    let overrides = [
        (&mut styles.background_color, &defaults.background_color),
        (&mut styles.font_family, &defaults.font_family),
        (&mut styles.font_size, &defaults.font_size),
        (&mut styles.line_height, &defaults.line_height),
        (&mut styles.text_color, &defaults.text_color),
        (&mut styles.link_color, &defaults.link_color),
        (&mut styles.container_width, &defaults.container_width),
    ];
    for (field, value) in overrides {
        if let Some(value) = value {
            *field = value.clone();
        }
    }
    styles
}

/// Mirror a document's place under the templates dir into the output dir
fn output_path_for(document: &Path, templates_dir: &Path, output_dir: &Path) -> PathBuf {
    let relative = match document.strip_prefix(templates_dir) {
        Ok(relative) => relative.to_path_buf(),
        Err(_) => PathBuf::from(document.file_name().unwrap_or_default()),
    };
    output_dir.join(relative).with_extension("html")
}
