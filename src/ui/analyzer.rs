/// Analyzer page
///
/// Glue between the `Analyzer` state machine and iced: user actions
/// become state transitions, background work becomes `Task`s, and the
/// current state is rendered.
use iced::widget::{
    button, column, container, horizontal_space, row, text, Column, Image, Row,
};
use iced::{Alignment, ContentFit, Element, Length, Task};
use iced_aw::Wrap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::media::loader::{self, IMAGE_EXTENSIONS};
use crate::media::preview::{self, Preview};
use crate::router::{Navigator, Route};
use crate::service::AnalysisService;
use crate::state::analyzer::{AnalysisJob, Analyzer};
use crate::state::data::{AnalysisResult, PickedFile};
use crate::state::error::{AnalysisError, LoadError};
use crate::ui::theme;

#[derive(Debug, Clone)]
pub enum Message {
    /// User clicked the upload zone
    PickFile,
    /// Picker closed, with or without a choice
    FilePicked(Option<PathBuf>),
    /// A file was dropped onto the window
    FileDropped(PathBuf),
    /// A file read dispatched under the given epoch finished
    FileLoaded(u64, Result<PickedFile, LoadError>),
    PreviewReady(u64, Preview),
    Analyze,
    AnalysisFinished(u64, Result<AnalysisResult, AnalysisError>),
    Reset,
    ToggleExtractedText,
    Back,
}

pub struct AnalyzerView {
    analyzer: Analyzer,
    service: Arc<dyn AnalysisService>,
}

impl AnalyzerView {
    pub fn new(service: Arc<dyn AnalysisService>) -> Self {
        Self {
            analyzer: Analyzer::new(),
            service,
        }
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// Entered from the landing page: always start from an empty upload
    pub fn open(&mut self) {
        self.analyzer.reset();
    }

    pub fn update(&mut self, message: Message, navigator: &mut dyn Navigator) -> Task<Message> {
        match message {
            Message::PickFile => Task::perform(pick_image(), Message::FilePicked),
            Message::FilePicked(None) => Task::none(),
            Message::FilePicked(Some(path)) | Message::FileDropped(path) => {
                let epoch = self.analyzer.begin_acquisition();
                tracing::debug!(path = %path.display(), epoch, "acquiring file");
                Task::perform(
                    async move { loader::load_file(&path).await },
                    move |outcome| Message::FileLoaded(epoch, outcome),
                )
            }
            Message::FileLoaded(epoch, outcome) => match self.analyzer.acquire(epoch, outcome) {
                Some(job) => {
                    let epoch = job.epoch;
                    Task::perform(preview::generate_preview(job.image.payload()), move |p| {
                        Message::PreviewReady(epoch, p)
                    })
                }
                None => Task::none(),
            },
            Message::PreviewReady(epoch, preview) => {
                self.analyzer.apply_preview(epoch, preview);
                Task::none()
            }
            Message::Analyze => match self.analyzer.begin_analysis() {
                Some(AnalysisJob { epoch, image }) => {
                    let service = Arc::clone(&self.service);
                    Task::perform(async move { service.analyze(image).await }, move |outcome| {
                        Message::AnalysisFinished(epoch, outcome)
                    })
                }
                None => Task::none(),
            },
            Message::AnalysisFinished(epoch, outcome) => {
                self.analyzer.finish_analysis(epoch, outcome);
                Task::none()
            }
            Message::Reset => {
                self.analyzer.reset();
                Task::none()
            }
            Message::ToggleExtractedText => {
                self.analyzer.toggle_extracted_text();
                Task::none()
            }
            Message::Back => {
                // Started directly on /analyze: nothing to go back to
                if !navigator.back() {
                    navigator.navigate(Route::Landing);
                }
                Task::none()
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let header = column![
            row![
                button("‹ Back").on_press(Message::Back).style(button::text),
                horizontal_space(),
            ],
            text("Nutrition Label Analyzer").size(40).color(theme::BRAND_ACCENT),
            text("Upload a photo of any nutrition label to get instant health insights")
                .size(18)
                .color(theme::MUTED),
        ]
        .spacing(8)
        .align_x(Alignment::Center);

        let panels = row![
            container(self.upload_panel()).width(Length::FillPortion(1)),
            container(self.results_panel()).width(Length::FillPortion(1)),
        ]
        .spacing(32);

        let content = column![header, panels]
            .spacing(40)
            .padding(32)
            .max_width(1100);

        container(content).width(Length::Fill).center_x(Length::Fill).into()
    }

    fn upload_panel(&self) -> Element<'_, Message> {
        let mut panel = Column::new()
            .spacing(20)
            .push(text("📷 Upload Image").size(24));

        match self.analyzer.image() {
            None => {
                let drop_zone = button(
                    column![
                        text("⬆").size(48).color(theme::MUTED),
                        text("Drop your image here or click to browse").size(18),
                        text("Supports JPG, PNG, and other image formats")
                            .size(14)
                            .color(theme::MUTED),
                    ]
                    .spacing(12)
                    .align_x(Alignment::Center)
                    .width(Length::Fill),
                )
                .on_press(Message::PickFile)
                .padding(48)
                .width(Length::Fill)
                .style(button::secondary);

                panel = panel.push(drop_zone);
            }
            Some(image) => {
                let picture: Element<'_, Message> = match self.analyzer.preview() {
                    Some(preview) => Image::new(preview.handle.clone())
                        .width(Length::Fill)
                        .height(256)
                        .content_fit(ContentFit::Contain)
                        .into(),
                    None => container(text("Preparing preview...").color(theme::MUTED))
                        .center_x(Length::Fill)
                        .center_y(256)
                        .into(),
                };

                let loading = self.analyzer.is_loading();
                let analyze_label = if loading {
                    "⏳ Analyzing..."
                } else {
                    "Analyze Nutrition"
                };

                let actions = row![
                    button(container(text(analyze_label)).center_x(Length::Fill))
                        .on_press_maybe((!loading).then_some(Message::Analyze))
                        .padding([12, 24])
                        .width(Length::Fill)
                        .style(button::primary),
                    button("Reset")
                        .on_press(Message::Reset)
                        .padding([12, 24])
                        .style(button::secondary),
                ]
                .spacing(12);

                let caption = match self.analyzer.preview().and_then(|p| p.dimensions) {
                    Some((width, height)) => format!("{} · {}×{}", image.name(), width, height),
                    None => image.name().to_string(),
                };

                panel = panel
                    .push(picture)
                    .push(text(caption).size(14).color(theme::MUTED))
                    .push(actions);
            }
        }

        if let Some(error) = self.analyzer.error() {
            panel = panel.push(
                container(text(format!("✖ {error}")))
                    .padding(16)
                    .width(Length::Fill)
                    .style(theme::banner(theme::ERROR, theme::ERROR_BG)),
            );
        }

        container(panel)
            .padding(32)
            .width(Length::Fill)
            .style(theme::card)
            .into()
    }

    fn results_panel(&self) -> Element<'_, Message> {
        let body = match self.analyzer.result() {
            Some(result) => result_view(result, self.analyzer.shows_extracted_text()),
            None => how_it_works(),
        };

        container(body)
            .padding(32)
            .width(Length::Fill)
            .style(theme::card)
            .into()
    }
}

/// Open the native picker for a single image
async fn pick_image() -> Option<PathBuf> {
    rfd::AsyncFileDialog::new()
        .set_title("Select a nutrition label photo")
        .add_filter("Images", IMAGE_EXTENSIONS)
        .add_filter("All files", &["*"])
        .pick_file()
        .await
        .map(|handle| handle.path().to_path_buf())
}

fn result_view(result: &AnalysisResult, show_extracted_text: bool) -> Element<'_, Message> {
    let treatment = result.classification.treatment();

    let mut badge_row = Row::new().spacing(8).align_y(Alignment::Center);
    if let Some(glyph) = theme::glyph(treatment) {
        badge_row = badge_row.push(text(glyph));
    }
    badge_row = badge_row
        .push(text(result.classification.as_str()).size(18))
        .push(text(format!("({}/100)", theme::format_amount(result.score))).size(14));

    let badge = container(badge_row)
        .padding([8, 16])
        .style(theme::badge(treatment));

    let assessment = column![
        text("Assessment:").size(18),
        text(result.message.as_str()).color(theme::MUTED),
    ]
    .spacing(8);

    let suggestion = result.suggestion().map(|better| {
        container(
            column![text("💡 Suggestion:").size(18), text(better)].spacing(8),
        )
        .padding(16)
        .width(Length::Fill)
        .style(theme::banner(theme::SUGGESTION, theme::SUGGESTION_BG))
    });

    let facts = &result.nutrition_data;
    let fact_cells: Vec<Element<'_, Message>> = [
        ("Calories", facts.calories, " kcal"),
        ("Sugar", facts.sugar, "g"),
        ("Saturated Fat", facts.sat_fat, "g"),
        ("Sodium", facts.sodium, "mg"),
        ("Fiber", facts.fiber, "g"),
        ("Protein", facts.protein, "g"),
    ]
    .into_iter()
    .map(|(label, value, unit)| {
        container(
            column![
                text(label).size(13).color(theme::MUTED),
                text(format!("{}{}", theme::format_amount(value), unit)).size(18),
            ]
            .spacing(4),
        )
        .padding(12)
        .width(180)
        .style(theme::card)
        .into()
    })
    .collect();

    let nutrition = column![
        text("Nutrition Facts:").size(18),
        Wrap::with_elements(fact_cells).spacing(12.0).line_spacing(12.0),
    ]
    .spacing(12);

    let extracted = result.diagnostic_text().map(|raw| {
        let toggle_label = if show_extracted_text {
            "▾ Hide extracted text"
        } else {
            "▸ View extracted text"
        };
        let mut section = Column::new().spacing(8).push(
            button(text(toggle_label).size(14).color(theme::MUTED))
                .on_press(Message::ToggleExtractedText)
                .style(button::text),
        );
        if show_extracted_text {
            section = section.push(
                container(text(raw).size(14))
                    .padding(12)
                    .width(Length::Fill)
                    .style(theme::card),
            );
        }
        section
    });

    column![text("Analysis Results").size(24), badge, assessment]
        .push_maybe(suggestion)
        .push(nutrition)
        .push_maybe(extracted)
        .spacing(24)
        .into()
}

fn how_it_works<'a>() -> Element<'a, Message> {
    let steps = [
        ("1", "Upload Image", "Take a clear photo of the nutrition label"),
        ("2", "AI Analysis", "Our AI extracts and analyzes nutrition data"),
        (
            "3",
            "Get Results",
            "Receive health classification and recommendations",
        ),
    ];

    let mut content = Column::new()
        .spacing(20)
        .push(text("How it works").size(24));

    for (number, title, description) in steps {
        content = content.push(
            row![
                container(text(number).size(14).color(theme::BRAND))
                    .padding([6, 12])
                    .style(theme::card),
                column![
                    text(title).size(16),
                    text(description).size(14).color(theme::MUTED),
                ]
                .spacing(4),
            ]
            .spacing(16)
            .align_y(Alignment::Start),
        );
    }

    content.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::Router;
    use crate::state::analyzer::Phase;
    use async_trait::async_trait;

    struct UnreachableService;

    #[async_trait]
    impl AnalysisService for UnreachableService {
        async fn analyze(
            &self,
            _image: crate::state::data::SelectedImage,
        ) -> Result<AnalysisResult, AnalysisError> {
            Err(AnalysisError::Transport("connection refused".into()))
        }
    }

    fn view() -> AnalyzerView {
        AnalyzerView::new(Arc::new(UnreachableService))
    }

    fn png_file() -> PickedFile {
        PickedFile {
            name: "label.png".into(),
            media_type: "image/png".into(),
            bytes: Arc::from(&b"png"[..]),
        }
    }

    fn load(view: &mut AnalyzerView, router: &mut Router, file: PickedFile) {
        let epoch = view.analyzer.begin_acquisition();
        let _ = view.update(Message::FileLoaded(epoch, Ok(file)), router);
    }

    fn text_file() -> PickedFile {
        PickedFile {
            name: "notes.txt".into(),
            media_type: "text/plain".into(),
            bytes: Arc::from(&b"notes"[..]),
        }
    }

    #[test]
    fn test_analyze_without_file_reports_error() {
        let mut view = view();
        let mut router = Router::new(Route::Analyzer);

        let _ = view.update(Message::Analyze, &mut router);

        assert_eq!(view.analyzer().phase(), Phase::Empty);
        assert_eq!(view.analyzer().error(), Some("Please select an image first"));
    }

    #[test]
    fn test_loaded_file_then_analyze_enters_loading() {
        let mut view = view();
        let mut router = Router::new(Route::Analyzer);

        load(&mut view, &mut router, png_file());
        assert_eq!(view.analyzer().phase(), Phase::Selected);

        let _ = view.update(Message::Analyze, &mut router);
        assert!(view.analyzer().is_loading());

        // Second press while loading changes nothing
        let _ = view.update(Message::Analyze, &mut router);
        assert!(view.analyzer().is_loading());

        let _ = view.update(
            Message::AnalysisFinished(1, Err(AnalysisError::Transport("connection refused".into()))),
            &mut router,
        );
        assert_eq!(view.analyzer().phase(), Phase::Selected);
        assert_eq!(view.analyzer().error(), Some("connection refused"));
    }

    #[test]
    fn test_back_without_history_goes_to_landing() {
        let mut view = view();
        let mut router = Router::new(Route::Analyzer);

        let _ = view.update(Message::Back, &mut router);

        assert_eq!(router.current(), Route::Landing);
    }

    #[test]
    fn test_reset_and_back() {
        let mut view = view();
        let mut router = Router::new(Route::Landing);
        router.navigate(Route::Analyzer);

        load(&mut view, &mut router, png_file());
        let _ = view.update(Message::Reset, &mut router);
        assert_eq!(view.analyzer().phase(), Phase::Empty);
        assert_eq!(view.analyzer().error(), None);

        let _ = view.update(Message::Back, &mut router);
        assert_eq!(router.current(), Route::Landing);
    }

    #[tokio::test]
    async fn test_service_call_drives_state() {
        let mut view = view();
        let mut router = Router::new(Route::Analyzer);
        load(&mut view, &mut router, png_file());

        let job = view.analyzer.begin_analysis().unwrap();
        let outcome = view.service.analyze(job.image).await;
        view.analyzer.finish_analysis(job.epoch, outcome);

        assert_eq!(view.analyzer().phase(), Phase::Selected);
        assert_eq!(view.analyzer().error(), Some("connection refused"));
        assert!(!view.analyzer().is_loading());
    }

    #[test]
    fn test_reset_while_read_pending_stays_empty() {
        let mut view = view();
        let mut router = Router::new(Route::Analyzer);

        let _ = view.update(Message::FileDropped(PathBuf::from("label.png")), &mut router);
        let _ = view.update(Message::Reset, &mut router);
        // The read dispatched by the drop was epoch 1
        let _ = view.update(Message::FileLoaded(1, Ok(png_file())), &mut router);

        assert_eq!(view.analyzer().phase(), Phase::Empty);
        assert!(view.analyzer().image().is_none());
    }

    #[test]
    fn test_multiple_drops_last_dropped_wins() {
        let mut view = view();
        let mut router = Router::new(Route::Analyzer);

        let _ = view.update(Message::FileDropped(PathBuf::from("label.png")), &mut router);
        let _ = view.update(Message::FileDropped(PathBuf::from("notes.txt")), &mut router);

        // Completion order is the reverse of drop order
        let _ = view.update(Message::FileLoaded(2, Ok(text_file())), &mut router);
        let _ = view.update(Message::FileLoaded(1, Ok(png_file())), &mut router);

        assert_eq!(view.analyzer().phase(), Phase::Empty);
        assert_eq!(
            view.analyzer().error(),
            Some("Please select a valid image file (JPEG, PNG)")
        );
    }

    #[tokio::test]
    async fn test_real_reads_resolve_by_dispatch_order() {
        let dir = std::env::temp_dir().join(format!("nutrix_drop_test_{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        let image_path = dir.join("label.png");
        let text_path = dir.join("notes.txt");
        std::fs::write(&image_path, vec![0u8; 1 << 20]).expect("write image");
        std::fs::write(&text_path, b"notes").expect("write text");

        let mut view = view();
        let mut router = Router::new(Route::Analyzer);
        let _ = view.update(Message::FileDropped(image_path.clone()), &mut router);
        let _ = view.update(Message::FileDropped(text_path.clone()), &mut router);

        let text_outcome = loader::load_file(&text_path).await;
        let image_outcome = loader::load_file(&image_path).await;
        let _ = view.update(Message::FileLoaded(2, text_outcome), &mut router);
        let _ = view.update(Message::FileLoaded(1, image_outcome), &mut router);

        assert_eq!(view.analyzer().phase(), Phase::Empty);
        assert!(view.analyzer().error().is_some());

        std::fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[test]
    fn test_open_discards_previous_visit() {
        let mut view = view();
        let mut router = Router::new(Route::Analyzer);
        load(&mut view, &mut router, png_file());
        let job = view.analyzer.begin_analysis().unwrap();

        view.open();
        let _ = view.update(
            Message::AnalysisFinished(job.epoch, Err(AnalysisError::Transport("late".into()))),
            &mut router,
        );

        assert_eq!(view.analyzer().phase(), Phase::Empty);
        assert_eq!(view.analyzer().error(), None);
    }
}
