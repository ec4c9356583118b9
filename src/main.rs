use clap::{Arg, Command};
use deeplx::config::GatewayConfig;
use deeplx::jsonrpc::{DEFAULT_BEAM_COUNT, TranslateRequest, TranslationGateway};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("deeplx")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Translate text through the DeepL browser-extension protocol")
        .arg(
            Arg::new("text")
                .help("Text to translate")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("source")
                .long("source")
                .short('s')
                .help("Source language code, or auto to use the detected language")
                .default_value("auto"),
        )
        .arg(
            Arg::new("target")
                .long("target")
                .short('t')
                .help("Target language code")
                .default_value("en"),
        )
        .arg(
            Arg::new("beams")
                .long("beams")
                .short('b')
                .help("Preferred number of beams (alternatives)")
                .value_parser(clap::value_parser!(usize))
                .default_value("4"),
        )
        .arg(
            Arg::new("tag-handling")
                .long("tag-handling")
                .help("Treat the input as rich text even without tags")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("proxy")
                .long("proxy")
                .env("PROXY")
                .help("Outbound proxy for upstream requests"),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .env("UPSTREAM_TIMEOUT_SECS")
                .help("Per-call upstream timeout in seconds")
                .value_parser(clap::value_parser!(u64))
                .default_value("30"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the /translate response body as JSON")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Show detected languages and alternatives")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let text = matches.get_one::<String>("text").cloned().unwrap_or_default();
    let source = matches.get_one::<String>("source").cloned().unwrap_or_default();
    let target = matches.get_one::<String>("target").cloned().unwrap_or_default();
    let beams = matches
        .get_one::<usize>("beams")
        .copied()
        .unwrap_or(DEFAULT_BEAM_COUNT);
    let timeout = matches.get_one::<u64>("timeout").copied().unwrap_or(30);
    let verbose = matches.get_flag("verbose");

    let config = GatewayConfig::new()
        .with_proxy(matches.get_one::<String>("proxy").cloned())
        .with_timeout(Duration::from_secs(timeout));
    let gateway = TranslationGateway::from_config(&config)?;

    let request = TranslateRequest::new(text)
        .source_lang(source)
        .target_lang(target)
        .preferred_num_beams(beams)
        .tag_handling(matches.get_flag("tag-handling"));

    let result = match gateway.translate(&request).await {
        Ok(result) => result,
        Err(e) => {
            eprintln!("❌ Translation failed: {}", e);
            return Err(e.into());
        }
    };

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&result.to_response_body())?);
        return Ok(());
    }

    if verbose {
        println!("🌍 {} → {}", result.source_lang, result.target_lang);
        println!();
    }
    println!("{}", result.data);

    if verbose && !result.alternatives.is_empty() {
        println!();
        println!("Alternatives:");
        for (i, alternative) in result.alternatives.iter().enumerate() {
            println!("   [{}] \"{}\"", i, alternative);
        }
    }

    Ok(())
}
