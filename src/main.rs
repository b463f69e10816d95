use dotenv::dotenv;
use std::error::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use user_pager::HttpPageSource;
use user_pager::config::{ListingConfig, PagingMode};
use user_pager::models::{PageLimit, UserRecord, field_text};
use user_pager::pager::{FetchCoordinator, InfiniteScroll, LoadState, PageControls, SentinelSignal};

enum Command {
    Next,
    Previous,
    Go(u32),
    Limit(PageLimit),
    More,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let command = match words.next() {
        None | Some("m") => Command::More,
        Some("n") => Command::Next,
        Some("p") => Command::Previous,
        Some("q") => Command::Quit,
        Some("g") => {
            let page = words
                .next()
                .and_then(|w| w.parse().ok())
                .ok_or("usage: g <page>")?;
            Command::Go(page)
        }
        Some("l") => {
            let value: u32 = words
                .next()
                .and_then(|w| w.parse().ok())
                .ok_or("usage: l <10|20|30|50>")?;
            Command::Limit(PageLimit::new(value).map_err(|e| e.to_string())?)
        }
        Some(other) => return Err(format!("unknown command `{other}`")),
    };
    Ok(command)
}

fn print_rows(rows: &[UserRecord]) {
    for user in rows {
        println!(
            "{:<8} {:<14} {:<14} {:<32} {:<12} {:>4}",
            field_text(&user.id),
            field_text(&user.first_name),
            field_text(&user.last_name),
            field_text(&user.email),
            field_text(&user.branch),
            field_text(&user.age),
        );
    }
}

fn print_header() {
    println!(
        "{:<8} {:<14} {:<14} {:<32} {:<12} {:>4}",
        "ID", "First Name", "Last Name", "Email", "Branch", "Age"
    );
}

fn print_footer(state: &LoadState) {
    println!("Page {} of {}", state.current_page, state.total_pages);
    println!("Total Users: {}", state.total_count);
}

async fn run_pages(controls: PageControls) -> Result<(), Box<dyn Error>> {
    controls.activate().await;
    let state = controls.state();
    print_header();
    print_rows(&state.items);
    print_footer(&state);
    println!("commands: n, p, g <page>, l <limit>, q");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(Command::Next) => {
                controls.next_page().await;
            }
            Ok(Command::Previous) => {
                controls.previous_page().await;
            }
            Ok(Command::Go(page)) => {
                controls.go_to_page(page).await;
            }
            Ok(Command::Limit(limit)) => {
                controls.set_limit(limit).await;
            }
            Ok(Command::More) => continue,
            Ok(Command::Quit) => break,
            Err(message) => {
                println!("{message}");
                continue;
            }
        }

        let state = controls.state();
        print_header();
        print_rows(&state.items);
        print_footer(&state);
    }

    Ok(())
}

async fn run_scroll(coordinator: FetchCoordinator) -> Result<(), Box<dyn Error>> {
    let signal = SentinelSignal::new();
    let scroll = InfiniteScroll::new(coordinator.clone(), signal.clone());
    let mut updates = coordinator.subscribe();

    scroll.activate().await;
    let state = scroll.state();
    print_header();
    print_rows(&state.items);
    let mut shown = state.items.len();
    println!("commands: <enter> load more, l <limit>, q");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(Command::More) => {
                if !signal.notify_visible() {
                    println!("No more users.");
                    continue;
                }
                updates.wait_for(|s| !s.is_loading).await?;
            }
            Ok(Command::Limit(limit)) => {
                scroll.set_limit(limit).await;
                print_header();
                shown = 0;
            }
            Ok(Command::Quit) => break,
            Ok(_) => {
                println!("scroll mode only understands <enter>, l <limit> and q");
                continue;
            }
            Err(message) => {
                println!("{message}");
                continue;
            }
        }

        let state = scroll.state();
        print_rows(state.items.get(shown..).unwrap_or_default());
        shown = state.items.len();
        println!("Loaded {} of {} users", shown, state.total_count);
    }

    scroll.teardown();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = ListingConfig::from_env()?;
    tracing::info!(
        "Listing users from {} ({:?} mode, limit {})",
        config.endpoint,
        config.mode,
        config.limit
    );

    let coordinator = FetchCoordinator::new(HttpPageSource::from_config(&config), config.limit);

    match config.mode {
        PagingMode::Pages => run_pages(PageControls::new(coordinator)).await,
        PagingMode::Scroll => run_scroll(coordinator).await,
    }
}
