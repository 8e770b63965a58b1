// Application state for HTTP handlers
use crate::application::analysis_service::AnalysisService;
use crate::application::control_service::ControlService;
use crate::application::dashboard_service::DashboardService;
use crate::application::session_registry::SessionRegistry;
use std::sync::Arc;
use std::time::Duration;

pub struct AppState {
    pub registry: Arc<SessionRegistry>,
    pub dashboard_service: DashboardService,
    pub analysis_service: AnalysisService,
    pub control_service: ControlService,
    pub refresh_interval: Duration,
}
