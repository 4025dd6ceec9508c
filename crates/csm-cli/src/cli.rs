use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use csm_codec::TextEncoding;

#[derive(Parser)]
#[command(
    name = "csm",
    about = "Cloud Storage Manager: text, JSON and NDJSON objects in storage buckets",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Bucket for this call; overrides the configured default
    #[arg(short, long, global = true)]
    pub bucket: Option<String>,

    /// Project id; overrides the configuration and the environment
    #[arg(long, global = true)]
    pub project: Option<String>,

    /// Service account key file
    #[arg(long, global = true)]
    pub credentials: Option<PathBuf>,

    /// Use the hosting platform's identity
    #[arg(long, global = true)]
    pub hosted_function: bool,

    /// Store objects under a local directory instead of the cloud
    #[arg(long, global = true)]
    pub local_root: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ReadFormat {
    /// Pick from the key's extension
    Auto,
    Text,
    Json,
    Ndjson,
}

#[derive(Subcommand)]
pub enum Command {
    /// Download an object to a local file
    Download(DownloadArgs),
    /// Print an object as text, JSON or NDJSON
    Read(ReadArgs),
    /// Upload a local or staged file
    UploadFile(UploadFileArgs),
    /// Upload text
    UploadText(UploadArgs),
    /// Upload a JSON document
    UploadJson(UploadArgs),
    /// Upload NDJSON records
    UploadNdjson(UploadNdjsonArgs),
}

#[derive(Args)]
pub struct DownloadArgs {
    pub key: String,
    pub destination: PathBuf,
}

#[derive(Args)]
pub struct ReadArgs {
    pub key: String,
    #[arg(long, value_enum, default_value = "auto")]
    pub format: ReadFormat,
    #[arg(long, default_value = "utf-8")]
    pub encoding: TextEncoding,
}

#[derive(Args)]
pub struct UploadFileArgs {
    pub file_name: String,
    /// Upload FILE_NAME as a local path instead of from the staging area
    #[arg(long)]
    pub direct: bool,
}

#[derive(Args)]
pub struct UploadArgs {
    /// Object key
    pub file_name: String,
    /// Read the payload from this file instead of stdin
    #[arg(short, long)]
    pub input: Option<PathBuf>,
}

#[derive(Args)]
pub struct UploadNdjsonArgs {
    #[command(flatten)]
    pub upload: UploadArgs,
    /// Route the upload through a staged file
    #[arg(long)]
    pub staged: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_download() {
        let cli = Cli::try_parse_from(["csm", "download", "data/a.json", "/tmp/a.json"]).unwrap();
        if let Command::Download(args) = cli.command {
            assert_eq!(args.key, "data/a.json");
            assert_eq!(args.destination, PathBuf::from("/tmp/a.json"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_read_defaults() {
        let cli = Cli::try_parse_from(["csm", "read", "rows.ndjson"]).unwrap();
        if let Command::Read(args) = cli.command {
            assert_eq!(args.format, ReadFormat::Auto);
            assert_eq!(args.encoding, TextEncoding::Utf8);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_read_with_format_and_encoding() {
        let cli = Cli::try_parse_from([
            "csm", "read", "note.txt", "--format", "text", "--encoding", "latin-1",
        ])
        .unwrap();
        if let Command::Read(args) = cli.command {
            assert_eq!(args.format, ReadFormat::Text);
            assert_eq!(args.encoding, TextEncoding::Latin1);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_unknown_encoding_fails() {
        assert!(Cli::try_parse_from(["csm", "read", "k", "--encoding", "ebcdic"]).is_err());
    }

    #[test]
    fn parse_upload_file_direct() {
        let cli = Cli::try_parse_from(["csm", "upload-file", "out.csv", "--direct"]).unwrap();
        if let Command::UploadFile(args) = cli.command {
            assert!(args.direct);
            assert_eq!(args.file_name, "out.csv");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_upload_ndjson_staged() {
        let cli = Cli::try_parse_from([
            "csm", "upload-ndjson", "rows.ndjson", "-i", "rows.jsonl", "--staged",
        ])
        .unwrap();
        if let Command::UploadNdjson(args) = cli.command {
            assert!(args.staged);
            assert_eq!(args.upload.input, Some(PathBuf::from("rows.jsonl")));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "csm", "upload-text", "hi.txt", "--bucket", "exports", "--project", "p",
            "--hosted-function", "--local-root", "/srv/blobs", "-v",
        ])
        .unwrap();
        assert_eq!(cli.bucket.as_deref(), Some("exports"));
        assert_eq!(cli.project.as_deref(), Some("p"));
        assert!(cli.hosted_function);
        assert_eq!(cli.local_root, Some(PathBuf::from("/srv/blobs")));
        assert!(cli.verbose);
    }

    #[test]
    fn parse_config_path() {
        let cli = Cli::try_parse_from(["csm", "--config", "csm.toml", "read", "k"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("csm.toml")));
    }
}
