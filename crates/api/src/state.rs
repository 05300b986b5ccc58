use std::sync::Arc;

use speakcheck_config::Settings;
use speakcheck_services::evaluation::{AssemblyAiClient, EvaluationService, PollPolicy};
use speakcheck_services::questions::QuestionBank;
use speakcheck_services::records::{AirtableClient, RecordStore};
use speakcheck_services::upload::{UploadService, VimeoClient};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub evaluation: Arc<EvaluationService>,
    pub uploads: UploadService,
    pub records: Arc<dyn RecordStore>,
    pub questions: Arc<QuestionBank>,
}

impl AppState {
    /// Wires the production collaborators from settings.
    pub fn new(settings: Settings) -> Self {
        let evaluation = EvaluationService::new(
            Arc::new(AssemblyAiClient::new(&settings.assembly_ai)),
            PollPolicy::from(&settings.evaluation),
        );
        let uploads = UploadService::new(
            Arc::new(VimeoClient::new(&settings.vimeo)),
            settings.vimeo.folder_id.clone(),
        );
        let records: Arc<dyn RecordStore> = Arc::new(AirtableClient::new(&settings.airtable));

        Self {
            settings: Arc::new(settings),
            evaluation: Arc::new(evaluation),
            uploads,
            records,
            questions: Arc::new(QuestionBank::standard()),
        }
    }
}
