// Application state for HTTP handlers
use crate::application::chart_service::ChartService;
use crate::application::hover_service::HoverReplayService;

#[derive(Clone)]
pub struct AppState {
    pub chart_service: ChartService,
    pub hover_service: HoverReplayService,
    pub compress_responses: bool,
}
