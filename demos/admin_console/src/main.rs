//! Admin console demo: a scripted editing session against a running
//! storefront
//!
//! Signs in, mirrors the catalog, then walks one variety through the whole
//! lifecycle: create, hide, edit, delete. Changes made by other writers
//! surface between steps through the change feed.
//!
//! Usage:
//!
//! ```text
//! admin_console [BASE_URL] [USERNAME] [PASSWORD] [--yes]
//! ```
//!
//! `--yes` skips the delete confirmation.

use morel_core::{
    sort, validate_draft, Category, ItemDraft, ItemFilter, ItemPatch, MenuView, Potency,
    SortDirection, SortKey, Tier, COLOR_OPTIONS, DELETE_PROMPT,
};
use morel_sync::{ChangeFeed, FeedItem, ItemStore, NoticeKind, RemoteStore, Synchronizer};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let assume_yes = args.iter().any(|arg| arg == "--yes");
    let mut positional = args.iter().filter(|arg| !arg.starts_with("--"));
    let base_url = positional
        .next()
        .cloned()
        .unwrap_or_else(|| "http://127.0.0.1:8420".to_string());
    let username = positional
        .next()
        .cloned()
        .unwrap_or_else(|| "admin".to_string());
    let password = positional
        .next()
        .cloned()
        .unwrap_or_else(|| "morel-dev-secret".to_string());

    println!("Connecting to {base_url} as {username}");
    let mut store = RemoteStore::new(&base_url);
    store.sign_in(&username, &password).await?;
    let mut sync = Synchronizer::new(store);

    // The change feed runs on its own task; items drain between steps.
    let (tx, mut rx) = mpsc::unbounded_channel();
    let feed_url = base_url.clone();
    tokio::spawn(async move {
        let mut feed = ChangeFeed::new(&feed_url);
        loop {
            if tx.send(feed.next().await).is_err() {
                break;
            }
        }
    });

    sync.load().await?;
    report(&mut sync);
    print_menu(&sync);
    print_table(&sync);

    let draft = saucers_draft();
    if let Err(errors) = validate_draft(&draft) {
        println!("Draft rejected: {errors}");
        return Ok(());
    }
    println!("\nAdding {}...", draft.name);
    let id = sync.add(draft).await?;
    report(&mut sync);

    println!("\nHiding it...");
    let active = sync.toggle_active(&id).await?;
    println!("now {}", if active { "active" } else { "hidden" });
    report(&mut sync);

    println!("\nRewording the description...");
    let patch = ItemPatch {
        description: Some("Coastal wood lover, foraged to order in autumn".to_string()),
        ..ItemPatch::default()
    };
    sync.update(&id, patch).await?;
    report(&mut sync);

    drain(&mut sync, &mut rx).await?;
    print_table(&sync);

    if assume_yes || confirm(DELETE_PROMPT).await? {
        println!("\nDeleting it...");
        sync.remove(&id).await?;
        report(&mut sync);
    } else {
        println!("Keeping it.");
    }

    drain(&mut sync, &mut rx).await?;
    print_table(&sync);

    Ok(())
}

/// The variety this session creates and tears back down.
fn saucers_draft() -> ItemDraft {
    let mut draft = ItemDraft::template(Category::Mushroom);
    draft.name = "Flying Saucers".to_string();
    draft.scientific = "Psilocybe azurescens".to_string();
    draft.description = "Coastal wood lover with a famously deep character".to_string();
    draft.effects = vec![
        "Profound Visuals".to_string(),
        "Introspection".to_string(),
        "Body Buzz".to_string(),
    ];
    draft.potency = Potency::VeryHigh;
    draft.duration = "6-8 hours".to_string();
    draft.color = COLOR_OPTIONS[7].to_string();
    draft.tier = Tier::MegaBooms;
    let prices = ["$42", "$80", "$150", "$280"];
    for (value, price) in draft.pricing.values_mut().zip(prices) {
        *value = price.to_string();
    }
    draft
}

/// Apply whatever the change feed delivered while we were busy.
async fn drain<S: ItemStore>(
    sync: &mut Synchronizer<S>,
    rx: &mut mpsc::UnboundedReceiver<FeedItem>,
) -> Result<(), Box<dyn std::error::Error>> {
    while let Ok(item) = rx.try_recv() {
        match item {
            FeedItem::Resync => sync.load().await?,
            FeedItem::Change(event) => sync.apply_event(event),
        }
    }
    Ok(())
}

/// Print queued notices and the sticky error flag, if set.
fn report<S: ItemStore>(sync: &mut Synchronizer<S>) {
    for notice in sync.take_notices() {
        let tag = match notice.kind {
            NoticeKind::Success => "ok",
            NoticeKind::Error => "error",
        };
        println!("[{tag}] {}", notice.text);
    }
    if let Some(error) = sync.last_error() {
        println!("[state] error flag: {error}");
    }
}

/// The storefront view: active items only, grouped by category.
fn print_menu<S: ItemStore>(sync: &Synchronizer<S>) {
    let view = MenuView::project(sync.catalog());
    println!("\n== Menu ==");
    for item in &view.mushrooms {
        println!(
            "  {} ({}) - {} potency, {}",
            item.name, item.scientific, item.potency, item.duration
        );
    }
    if !view.specialties.is_empty() {
        println!("Specialties:");
        for item in &view.specialties {
            println!("  {} - {}", item.name, item.description);
        }
    }
}

/// The admin view: everything, active rows first.
fn print_table<S: ItemStore>(sync: &Synchronizer<S>) {
    let filter = ItemFilter::default();
    let mut rows = filter.apply(sync.catalog().iter());
    sort(&mut rows, SortKey::default(), SortDirection::default());
    println!("\n== All items ({}) ==", rows.len());
    for item in rows {
        let state = if item.is_active { "active" } else { "hidden" };
        let prices: Vec<String> = item
            .pricing
            .iter()
            .map(|(label, price)| format!("{label} {price}"))
            .collect();
        println!(
            "  [{state}] {} | {} | {} | {}",
            item.name,
            item.tier,
            item.potency,
            prices.join(", ")
        );
    }
}

async fn confirm(prompt: &str) -> Result<bool, Box<dyn std::error::Error>> {
    println!("\n{prompt} [y/N]");
    let line = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        std::io::stdin().read_line(&mut line).map(|_| line)
    })
    .await??;
    Ok(line.trim().eq_ignore_ascii_case("y"))
}
