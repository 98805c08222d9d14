use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use giftlink::clipboard::{ClipboardError, ClipboardSink, SystemClipboard};
use giftlink::clock::{local_date_string, Clock, SystemClock};
use giftlink::config::Config;
use giftlink::shortener::Shortener;
use giftlink::storage::{FileStore, KvStore};
use giftlink::theme::{VoucherTheme, THEMES};
use giftlink::view::creator::Creator;
use giftlink::view::display;
use giftlink::voucher::codec;
use giftlink::voucher::rate_limit::RateLimiter;
use giftlink::voucher::store::VoucherStore;
use giftlink::voucher::types::NewVoucher;

#[derive(Parser)]
#[command(
    name = "giftlink",
    about = "Create and share themed gift-voucher links",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a voucher and copy its share link
    Create {
        #[arg(long)]
        title: String,
        /// The redeemable code
        #[arg(long)]
        code: String,
        /// Theme id (see `giftlink themes`)
        #[arg(long, default_value = "birthday")]
        theme: String,
        #[arg(long)]
        provider: Option<String>,
        #[arg(long)]
        message: Option<String>,
        /// Informational expiry, epoch milliseconds
        #[arg(long)]
        expires: Option<i64>,
        /// Print the link without touching the clipboard
        #[arg(long)]
        no_copy: bool,
    },
    /// Render a voucher from an id or a pasted share link
    View {
        /// Voucher id or full share URL
        target: String,
        /// Share token override (the `data` query parameter)
        #[arg(long)]
        data: Option<String>,
        /// Copy the redeemable code to the clipboard
        #[arg(long)]
        copy_code: bool,
        /// Shorten the share link and copy it to the clipboard
        #[arg(long)]
        share: bool,
    },
    /// Re-surface the most recently created voucher and its link
    Last,
    /// List recent vouchers, newest first
    Recent,
    /// List available themes
    Themes,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load().context("loading configuration")?;

    let data_dir = config
        .storage
        .data_dir
        .clone()
        .unwrap_or_else(FileStore::default_dir);
    let storage: Arc<dyn KvStore> =
        Arc::new(FileStore::new(data_dir).context("opening voucher storage")?);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let store = VoucherStore::load(storage.clone(), clock.clone(), config.limits.recent_cap);
    let limiter = Arc::new(RateLimiter::new(
        storage,
        clock.clone(),
        config.limits.min_interval_ms,
        config.limits.daily_cap,
    ));
    let shortener = Arc::new(Shortener::from_config(&config.shortener));

    match cli.command {
        Command::Create {
            title,
            code,
            theme,
            provider,
            message,
            expires,
            no_copy,
        } => {
            let theme = VoucherTheme::parse(&theme).ok_or_else(|| {
                anyhow::anyhow!("Unknown theme '{}'; run `giftlink themes`", theme)
            })?;

            let creator = Creator::new(
                store,
                limiter,
                shortener,
                clock,
                config.link.origin.clone(),
            );
            let created = creator
                .submit(NewVoucher {
                    title,
                    code,
                    theme,
                    provider,
                    message,
                    expiry_date: expires,
                })
                .await?;

            if created.duplicate_code {
                eprintln!("Warning: another voucher with this code was created today.");
            }
            println!("Voucher {} created.", created.voucher.id);
            println!("Share link: {}", created.share_url);

            if !no_copy {
                match copy_to_clipboard(&created.share_url) {
                    Ok(()) => println!("Link copied to clipboard."),
                    Err(e) => {
                        eprintln!("Could not copy the link: {}", e);
                        eprintln!("The link above stays valid; `giftlink last` shows it again.");
                    }
                }
            }
        }

        Command::View {
            target,
            data,
            copy_code,
            share,
        } => {
            let (id, token) = match codec::parse_share_url(&target) {
                Some(parts) => (parts.id, parts.data.or(data)),
                None => (target, data),
            };

            match display::resolve(&store, &id, token.as_deref()) {
                Ok(voucher) => {
                    println!("{}", display::render_card(&voucher));

                    if copy_code {
                        let mut clipboard = SystemClipboard::new()?;
                        display::copy_code(&voucher, &mut clipboard)?;
                        println!("Code copied to clipboard.");
                    }
                    if share {
                        let token = codec::encode(&voucher)?;
                        let url = codec::build_share_url(
                            &config.link.origin,
                            &voucher.id,
                            &token,
                            clock.now_ms(),
                        );
                        let mut clipboard = SystemClipboard::new()?;
                        let link = display::share_link(&url, &shortener, &mut clipboard).await?;
                        println!("Share link copied: {}", link);
                    }
                }
                Err(not_found) => {
                    println!("{}", not_found);
                    println!("Run `giftlink create` to make your own.");
                }
            }
        }

        Command::Last => match store.current() {
            Some(voucher) => {
                let token = codec::encode(&voucher)?;
                let url = codec::build_share_url(
                    &config.link.origin,
                    &voucher.id,
                    &token,
                    clock.now_ms(),
                );
                let link = shortener.shorten(&url).await;
                println!("{}", display::render_card(&voucher));
                println!("Share link: {}", link);
            }
            None => println!("No vouchers created yet."),
        },

        Command::Recent => {
            let recent = store.recent();
            if recent.is_empty() {
                println!("No vouchers created yet.");
            }
            for voucher in recent {
                println!(
                    "{}  {}  {}  ({})",
                    voucher.id,
                    voucher.theme.descriptor().emoji,
                    voucher.title,
                    local_date_string(voucher.created_at)
                );
            }
        }

        Command::Themes => {
            for descriptor in THEMES {
                println!(
                    "{:<16} {} {}",
                    descriptor.theme.as_str(),
                    descriptor.emoji,
                    descriptor.name
                );
            }
        }
    }

    Ok(())
}

fn copy_to_clipboard(text: &str) -> Result<(), ClipboardError> {
    let mut clipboard = SystemClipboard::new()?;
    clipboard.set_text(text)
}
