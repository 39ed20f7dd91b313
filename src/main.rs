use clap::Parser;
use iced::event::{self, Event};
use iced::{window, Element, Subscription, Task, Theme};
use std::sync::Arc;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

mod config;
mod media;
mod router;
mod service;
mod state;
mod ui;

use router::{Route, Router};
use service::{AnalysisService, HttpAnalysisClient};
use state::error::ConfigError;
use ui::analyzer::{self, AnalyzerView};
use ui::landing::{self, LandingView};

/// Top-level failures that end the process
#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("window error: {0}")]
    Gui(#[from] iced::Error),
}

/// Main application state
struct NutriX {
    router: Router,
    landing: LandingView,
    analyzer: AnalyzerView,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    Landing(landing::Message),
    Analyzer(analyzer::Message),
}

impl NutriX {
    /// Create a new instance of the application
    fn new(initial_route: Route, service: Arc<dyn AnalysisService>) -> (Self, Task<Message>) {
        (
            NutriX {
                router: Router::new(initial_route),
                landing: LandingView::new(),
                analyzer: AnalyzerView::new(service),
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Landing(msg) => {
                let from = self.router.current();
                self.landing.update(msg, &mut self.router);
                if from == Route::Landing && self.router.current() == Route::Analyzer {
                    self.analyzer.open();
                }
                Task::none()
            }
            Message::Analyzer(msg) => self
                .analyzer
                .update(msg, &mut self.router)
                .map(Message::Analyzer),
        }
    }

    /// Build the user interface for the active route
    fn view(&self) -> Element<Message> {
        match self.router.current() {
            Route::Landing => self.landing.view().map(Message::Landing),
            Route::Analyzer => self.analyzer.view().map(Message::Analyzer),
        }
    }

    /// File drops only count while the analyzer is showing
    fn subscription(&self) -> Subscription<Message> {
        match self.router.current() {
            Route::Analyzer => event::listen_with(file_dropped),
            Route::Landing => Subscription::none(),
        }
    }

    fn title(&self) -> String {
        match self.router.current() {
            Route::Landing => "NutriX".to_string(),
            Route::Analyzer => "NutriX - Nutrition Label Analyzer".to_string(),
        }
    }

    fn theme(&self) -> Theme {
        match self.router.current() {
            Route::Landing => Theme::Dark,
            Route::Analyzer => Theme::Light,
        }
    }
}

fn file_dropped(event: Event, _status: event::Status, _window: window::Id) -> Option<Message> {
    match event {
        Event::Window(window::Event::FileDropped(path)) => {
            Some(Message::Analyzer(analyzer::Message::FileDropped(path)))
        }
        _ => None,
    }
}

fn main() -> Result<(), AppError> {
    let cli = config::Cli::parse();
    let settings = config::load_settings(&cli)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let client = HttpAnalysisClient::new(&settings.service_url)?;
    let initial_route = settings.initial_route;

    tracing::info!(
        endpoint = client.endpoint(),
        route = %initial_route,
        "NutriX starting"
    );

    let service: Arc<dyn AnalysisService> = Arc::new(client);

    iced::application(NutriX::title, NutriX::update, NutriX::view)
        .subscription(NutriX::subscription)
        .theme(NutriX::theme)
        .centered()
        .run_with(move || NutriX::new(initial_route, service))?;

    Ok(())
}
