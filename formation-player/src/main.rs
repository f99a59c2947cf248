use anyhow::Context;
use env_logger::{Builder, Target};
use formation_core::config::AppConfig;
use formation_core::i18n::{self, Label};
use formation_player::carousel::CarouselTimer;
use formation_player::session::SessionController;
use formation_player::AppContext;
use log::{LevelFilter, info, warn};

const DEMO_EMAIL: &str = "demo@formation.plus";
const CAROUSEL_TICKS: usize = 3;

fn init_logger() {
    Builder::new()
        .target(Target::Stdout)
        .filter_level(LevelFilter::Warn)
        .filter_module("formation_player", LevelFilter::Debug)
        .filter_module("formation_core", LevelFilter::Debug)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        init_logger();
    } else {
        env_logger::init();
    }

    let config = AppConfig::load().context("loading configuration")?;
    let locale = config.locale;
    let carousel_interval = config.carousel_interval;
    let ctx = AppContext::from_config(config).context("opening profile store")?;
    let mut session = SessionController::new(ctx);

    if !session.restore().await {
        if session.context().config().demo_mode {
            session.login(DEMO_EMAIL, "demo").await?;
        } else {
            warn!("No stored session; sign in through the client to continue");
            return Ok(());
        }
    }

    let state = session.state();
    info!(
        "{}: {} titles",
        Label::RecommendTitle.text(locale),
        state.catalog.len()
    );
    for entry in session.catalog_entries() {
        info!(
            "  {} [{}] {}{}",
            entry.item.display_title(locale),
            entry.item.id,
            i18n::like_count(entry.like_count, locale),
            if entry.liked { " ♥" } else { "" }
        );
    }
    for entry in session.continue_watching() {
        let (minutes, seconds) = i18n::minutes_seconds(entry.offset_secs);
        info!(
            "Continue watching: {} at {minutes}:{seconds:02}",
            entry.item.display_title(locale)
        );
    }

    let (timer, mut ticks) = CarouselTimer::spawn(carousel_interval);
    for _ in 0..CAROUSEL_TICKS {
        if ticks.recv().await.is_none() {
            break;
        }
        let index = session.advance_carousel();
        if let Some(hero) = session.state().hero_item() {
            info!("Hero #{index}: {}", hero.display_title(locale));
        }
    }
    timer.stop();

    Ok(())
}
