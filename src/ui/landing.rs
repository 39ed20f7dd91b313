/// Landing page
///
/// Static promotional content with a single real action: start the
/// analyzer. Navigation goes through the injected `Navigator`.
use iced::widget::{button, column, container, horizontal_space, row, text, Column};
use iced::{Alignment, Element, Length};
use iced_aw::Wrap;

use crate::router::{Navigator, Route};
use crate::ui::theme;

const STATS: [(&str, &str); 4] = [
    ("3+", "Active Users"),
    ("10+", "Substances Logged"),
    ("4.9★", "App Rating"),
    ("20+", "Calories Tracked"),
];

const FEATURES: [(&str, &str, &str); 3] = [
    (
        "📈",
        "Smart Analytics",
        "AI-powered insights that adapt to your lifestyle and goals",
    ),
    (
        "🍎",
        "Food Recognition",
        "Snap a photo and instantly log your meals with precision",
    ),
    (
        "⚡",
        "Real-time Tracking",
        "Live updates on your nutrition goals throughout the day",
    ),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    ToggleMenu,
    Start,
}

#[derive(Debug, Default)]
pub struct LandingView {
    menu_open: bool,
}

impl LandingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn update(&mut self, message: Message, navigator: &mut dyn Navigator) {
        match message {
            Message::ToggleMenu => self.menu_open = !self.menu_open,
            Message::Start => {
                self.menu_open = false;
                tracing::info!("starting analyzer");
                navigator.navigate(Route::Analyzer);
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let nav = row![
            text("🍎 NutriX").size(28).color(theme::BRAND),
            horizontal_space(),
            button("Get Started")
                .on_press(Message::Start)
                .padding([8, 20])
                .style(button::success),
            button(text(if self.menu_open() { "✕" } else { "☰" }))
                .on_press(Message::ToggleMenu)
                .padding(8)
                .style(button::secondary),
        ]
        .spacing(16)
        .align_y(Alignment::Center);

        let menu = self.menu_open().then(|| {
            container(
                column![
                    text("Features").color(theme::MUTED),
                    text("Pricing").color(theme::MUTED),
                    text("About").color(theme::MUTED),
                    button("Get Started")
                        .on_press(Message::Start)
                        .width(Length::Fill)
                        .style(button::success),
                ]
                .spacing(12),
            )
            .padding(16)
            .style(theme::card)
        });

        let hero = column![
            container(text("An app for those who care about themselves").size(14))
                .padding([6, 16])
                .style(theme::card),
            text("Transform Your").size(56),
            text("Nutrition Journey").size(56).color(theme::BRAND_ACCENT),
            text(
                "Effortlessly track your nutrition with AI-powered insights, personalized \
                 recommendations, and a community that supports your wellness goals."
            )
            .size(20)
            .color(theme::MUTED),
            button(text("Start The Application  ›").size(18))
                .on_press(Message::Start)
                .padding([14, 32])
                .style(button::success),
        ]
        .spacing(20)
        .align_x(Alignment::Center);

        let stats = Wrap::with_elements(
            STATS
                .iter()
                .map(|(number, label)| {
                    column![
                        text(*number).size(36).color(theme::BRAND),
                        text(*label).size(14).color(theme::MUTED),
                    ]
                    .align_x(Alignment::Center)
                    .width(160)
                    .into()
                })
                .collect(),
        )
        .spacing(32.0)
        .line_spacing(16.0);

        let features = Wrap::with_elements(
            FEATURES
                .iter()
                .map(|(icon, title, description)| {
                    container(
                        column![
                            text(*icon).size(32),
                            text(*title).size(20),
                            text(*description).color(theme::MUTED),
                        ]
                        .spacing(12),
                    )
                    .padding(24)
                    .width(280)
                    .style(theme::card)
                    .into()
                })
                .collect(),
        )
        .spacing(24.0)
        .line_spacing(24.0);

        let content: Column<Message> = column![nav]
            .push_maybe(menu)
            .push(hero)
            .push(stats)
            .push(features)
            .spacing(48)
            .padding(40)
            .align_x(Alignment::Center);

        container(content).width(Length::Fill).center_x(Length::Fill).into()
    }
}
