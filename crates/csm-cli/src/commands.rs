use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use serde_json::Value;
use tracing::debug;

use csm_auth::{AmbientEnvironment, Credentials};
use csm_codec::{ndjson, TextEncoding};
use csm_manager::{CloudStorage, ManagerConfig};
use csm_store::BackendConfig;
use csm_types::{ObjectKey, PayloadFormat};

use crate::cli::*;

pub fn run_command(cli: Cli, ambient: AmbientEnvironment) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    debug!(?config, "effective configuration");
    let storage = CloudStorage::open(&config, ambient).context("failed to open storage")?;
    let bucket = cli.bucket.as_deref();

    match cli.command {
        Command::Download(args) => cmd_download(&storage, bucket, args),
        Command::Read(args) => cmd_read(&storage, bucket, args),
        Command::UploadFile(args) => cmd_upload_file(&storage, bucket, args),
        Command::UploadText(args) => cmd_upload_text(&storage, bucket, args),
        Command::UploadJson(args) => cmd_upload_json(&storage, bucket, args),
        Command::UploadNdjson(args) => cmd_upload_ndjson(&storage, bucket, args),
    }
}

/// The configuration file (if any) with command-line overrides applied.
fn load_config(cli: &Cli) -> anyhow::Result<ManagerConfig> {
    let mut config = match &cli.config {
        Some(path) => ManagerConfig::load(path)?,
        None => ManagerConfig::default(),
    };
    if let Some(project) = &cli.project {
        config.project_id = Some(project.clone());
    }
    if let Some(path) = &cli.credentials {
        config.credentials = Some(Credentials::FilePath(path.clone()));
    }
    if cli.hosted_function {
        config.hosted_function = true;
    }
    if let Some(root) = &cli.local_root {
        config.backend = BackendConfig::Local { root: root.clone() };
    }
    Ok(config)
}

fn read_payload(input: Option<&Path>) -> anyhow::Result<Vec<u8>> {
    match input {
        Some(path) => fs::read(path).with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf).context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn cmd_download(storage: &CloudStorage, bucket: Option<&str>, args: DownloadArgs) -> anyhow::Result<()> {
    let path = storage.download(bucket, &args.key, &args.destination)?;
    println!("{} Downloaded {} → {}", "✓".green().bold(), args.key.yellow(), path.display());
    Ok(())
}

fn cmd_read(storage: &CloudStorage, bucket: Option<&str>, args: ReadArgs) -> anyhow::Result<()> {
    let format = match args.format {
        ReadFormat::Auto => PayloadFormat::infer(&ObjectKey::new(args.key.as_str())?),
        ReadFormat::Text => PayloadFormat::Text,
        ReadFormat::Json => PayloadFormat::Json,
        ReadFormat::Ndjson => PayloadFormat::Ndjson,
    };
    match format {
        PayloadFormat::Text => {
            print!("{}", storage.read_text(bucket, &args.key, args.encoding)?);
        }
        PayloadFormat::Json => {
            let value: Value = storage.read_json(bucket, &args.key, args.encoding)?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        PayloadFormat::Ndjson => {
            let rows: Vec<Value> = storage.read_ndjson(bucket, &args.key, args.encoding)?;
            for row in &rows {
                println!("{row}");
            }
        }
    }
    Ok(())
}

fn cmd_upload_file(storage: &CloudStorage, bucket: Option<&str>, args: UploadFileArgs) -> anyhow::Result<()> {
    let result = storage.upload_file(bucket, &args.file_name, !args.direct)?;
    let source = if args.direct { "local path" } else { "staging" };
    println!("{} {} ({} from {})", "✓".green().bold(), result, args.file_name.yellow(), source);
    Ok(())
}

fn cmd_upload_text(storage: &CloudStorage, bucket: Option<&str>, args: UploadArgs) -> anyhow::Result<()> {
    let payload = String::from_utf8(read_payload(args.input.as_deref())?)
        .context("text payload is not valid UTF-8")?;
    let result = storage.upload_text(&payload, &args.file_name, bucket)?;
    println!("{} {} ({}, {} bytes)", "✓".green().bold(), result, args.file_name.yellow(), payload.len());
    Ok(())
}

fn cmd_upload_json(storage: &CloudStorage, bucket: Option<&str>, args: UploadArgs) -> anyhow::Result<()> {
    let payload = read_payload(args.input.as_deref())?;
    let value: Value = serde_json::from_slice(&payload).context("payload is not a JSON document")?;
    let result = storage.upload_json(&value, &args.file_name, bucket)?;
    println!("{} {} ({})", "✓".green().bold(), result, args.file_name.yellow());
    Ok(())
}

fn cmd_upload_ndjson(storage: &CloudStorage, bucket: Option<&str>, args: UploadNdjsonArgs) -> anyhow::Result<()> {
    let payload = read_payload(args.upload.input.as_deref())?;
    let rows: Vec<Value> = ndjson::decode(&payload, TextEncoding::Utf8)?;
    let file_name = &args.upload.file_name;
    let result = if args.staged {
        storage.upload_ndjson_file(&rows, file_name, bucket)?
    } else {
        storage.upload_ndjson(&rows, file_name, bucket)?
    };
    println!("{} {} ({}, {} records)", "✓".green().bold(), result, file_name.yellow(), rows.len().to_string().bold());
    Ok(())
}
