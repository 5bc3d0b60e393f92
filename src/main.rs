use chrono::{Local, Utc};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{error::Error, io};

mod app;
mod cities;
mod cli;
mod condition;
mod config;
mod deeplink;
mod error;
mod locale;
mod logging;
mod metno;
mod qr;
mod refresh;
mod selector;
mod units;
mod weather;

use crate::app::{run_app, App};
use crate::cli::Args;
use crate::config::Config;
use crate::deeplink::DeepLink;
use crate::metno::{ForecastSource, MetClient};
use crate::refresh::{Outcome, Refresher};

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    if args.list_cities {
        for city in &cities::CITIES {
            println!("{:14} {:14} {}", city.key, city.name, city.address);
        }
        return Ok(());
    }

    let config = Config::load(args.config.as_deref())?;
    logging::init(&config.log)?;

    let link = match &args.link {
        Some(link) => DeepLink::parse(link)?,
        None => DeepLink::default(),
    };
    let city = cities::lookup(args.city.as_deref().unwrap_or(&config.city))?;
    let client = MetClient::new(
        &config.api_base_url,
        &config.user_agent,
        config.request_timeout(),
    )?;
    let mut app = App::new(city, config.qr.clone());

    if args.print {
        let outcome = Outcome {
            city: city.key,
            fetched_at: Utc::now(),
            result: client.fetch(city),
        };
        app.apply(outcome, Utc::now(), &Local);
        println!("{}", app::snapshot(&app, Local::now()));
        return Ok(());
    }

    if args.mobile || link.mobile {
        app.open_picker(link.city.as_deref());
    }
    let refresher = Refresher::spawn(client, city, config.refresh_interval());

    // setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // create app and run it
    let res = run_app(&mut terminal, &mut app, &refresher);

    // restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::error!("terminal error: {err}");
        println!("{:?}", err)
    }

    Ok(())
}
