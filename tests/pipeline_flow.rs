//! End-to-end pipeline properties with scripted doubles (no network).

use airwatch::blobs::{BlobStore, MemoryBlobStore};
use airwatch::config::PipelineConfig;
use airwatch::external::{ExternalDataProvider, ExternalSnippet, StaticConditionsProvider};
use airwatch::models::FixedModelService;
use airwatch::pipeline::{Pipeline, ProgressSink, Request, Stage};
use std::sync::{Arc, Mutex};

struct FailingProvider;

#[async_trait::async_trait]
impl ExternalDataProvider for FailingProvider {
    async fn fetch_current_conditions(
        &self,
        _locale: Option<&str>,
    ) -> anyhow::Result<ExternalSnippet> {
        anyhow::bail!("provider outage")
    }
}

#[derive(Default)]
struct RecordingSink(Mutex<Vec<Stage>>);

impl ProgressSink for RecordingSink {
    fn stage_complete(&self, stage: Stage) {
        self.0.lock().unwrap().push(stage);
    }
}

fn pipeline_with(
    models: Arc<FixedModelService>,
    conditions: Arc<dyn ExternalDataProvider>,
    blobs: Arc<MemoryBlobStore>,
) -> Pipeline {
    Pipeline::new(models, conditions, blobs, PipelineConfig::default())
}

fn capabilities(calls: &[(String, String)]) -> Vec<&str> {
    calls.iter().map(|(capability, _)| capability.as_str()).collect()
}

#[tokio::test]
async fn text_run_matches_example_scenario() {
    let models = Arc::new(
        FixedModelService::new()
            .push_generation("AQI 150, unhealthy")
            .push_generation("Reduce outdoor activity; alert issued"),
    );
    let sink = Arc::new(RecordingSink::default());
    let pipeline = pipeline_with(
        models.clone(),
        Arc::new(StaticConditionsProvider::default()),
        Arc::new(MemoryBlobStore::new()),
    )
    .with_progress(sink.clone());

    let response = pipeline
        .run(Request::text("Heavy smog downtown today"))
        .await
        .unwrap();

    assert_eq!(response.text, "Reduce outdoor activity; alert issued");

    // Intake is the identity for text: the observation reaches Analysis verbatim
    let calls = models.calls();
    assert!(calls[0].1.contains("Heavy smog downtown today"));

    // Vision is never invoked for text modality
    assert_eq!(capabilities(&calls), vec!["generate", "generate"]);

    // All four checkpoints fire in order (Vision reports its skip)
    assert_eq!(
        *sink.0.lock().unwrap(),
        vec![Stage::Intake, Stage::Vision, Stage::Analysis, Stage::Orchestration]
    );
}

#[tokio::test]
async fn image_run_feeds_vision_text_to_orchestration() {
    let blobs = Arc::new(MemoryBlobStore::new());
    let blob = blobs.store(&[0x89, b'P', b'N', b'G', 0x0d, 0x0a]).await.unwrap();

    let models = Arc::new(
        FixedModelService::new()
            .with_description("Thick haze over the skyline")
            .push_generation("Visibility-based AQI estimate: poor")
            .push_generation("Stay indoors until the haze lifts"),
    );
    let pipeline = pipeline_with(
        models.clone(),
        Arc::new(StaticConditionsProvider::default()),
        blobs.clone(),
    );

    let response = pipeline.run(Request::image(blob.clone())).await.unwrap();
    assert_eq!(response.text, "Stay indoors until the haze lifts");

    let calls = models.calls();
    assert_eq!(capabilities(&calls), vec!["describe", "generate", "generate"]);

    // Orchestration's context always includes the vision description
    let orchestration_prompt = &calls[2].1;
    assert!(orchestration_prompt.contains("Vision: Thick haze over the skyline"));

    // The temporary image blob is gone after Done
    assert!(!blobs.contains(&blob));
}

#[tokio::test]
async fn voice_transcription_flows_downstream() {
    let blobs = Arc::new(MemoryBlobStore::new());
    let blob = blobs.store(b"riff wav bytes").await.unwrap();

    let models = Arc::new(
        FixedModelService::new().with_transcription("smoke drifting over the highway"),
    );
    let pipeline = pipeline_with(
        models.clone(),
        Arc::new(StaticConditionsProvider::default()),
        blobs.clone(),
    );

    pipeline.run(Request::voice(blob.clone())).await.unwrap();

    let calls = models.calls();
    assert_eq!(
        capabilities(&calls),
        vec!["transcribe", "generate", "generate"]
    );
    assert!(calls[1].1.contains("smoke drifting over the highway"));
    assert!(!blobs.contains(&blob));
}

#[tokio::test]
async fn provider_failure_falls_back_to_unaugmented_prompt() {
    let models = Arc::new(FixedModelService::new());
    let pipeline = pipeline_with(
        models.clone(),
        Arc::new(FailingProvider),
        Arc::new(MemoryBlobStore::new()),
    );

    let response = pipeline
        .run(Request::text("ash falling in the suburbs"))
        .await
        .unwrap();
    assert!(!response.text.is_empty());

    let analysis_prompt = &models.calls()[0].1;
    assert!(analysis_prompt.contains("ash falling in the suburbs"));
    assert!(!analysis_prompt.contains("External data"));
}

#[tokio::test]
async fn augmented_analysis_prompt_embeds_the_snippet() {
    let models = Arc::new(FixedModelService::new());
    let pipeline = pipeline_with(
        models.clone(),
        Arc::new(StaticConditionsProvider::default()),
        Arc::new(MemoryBlobStore::new()),
    );

    pipeline.run(Request::text("smog report")).await.unwrap();

    let analysis_prompt = &models.calls()[0].1;
    assert!(analysis_prompt.contains("External data (stub): Current AQI: 150 (Unhealthy)"));
}

#[tokio::test]
async fn augmentation_disabled_by_config_skips_the_snippet() {
    let models = Arc::new(FixedModelService::new());
    let config = PipelineConfig {
        augment_with_external: false,
        ..PipelineConfig::default()
    };
    let pipeline = Pipeline::new(
        models.clone(),
        Arc::new(StaticConditionsProvider::default()),
        Arc::new(MemoryBlobStore::new()),
        config,
    );

    pipeline.run(Request::text("smog report")).await.unwrap();
    assert!(!models.calls()[0].1.contains("External data"));
}

#[tokio::test]
async fn vision_failure_short_circuits_and_names_the_stage() {
    let blobs = Arc::new(MemoryBlobStore::new());
    let blob = blobs.store(&[0xff, 0xd8, 0xff]).await.unwrap();

    let models = Arc::new(FixedModelService::new().failing_description("model rejected image"));
    let pipeline = pipeline_with(
        models.clone(),
        Arc::new(StaticConditionsProvider::default()),
        blobs.clone(),
    );

    let err = pipeline.run(Request::image(blob.clone())).await.unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Vision));

    // Analysis and Orchestration never ran
    assert_eq!(capabilities(&models.calls()), vec!["describe"]);

    // Blob cleanup happens on the Failed path too
    assert!(!blobs.contains(&blob));
}

#[tokio::test]
async fn transcription_failure_names_intake_and_skips_the_rest() {
    let blobs = Arc::new(MemoryBlobStore::new());
    let blob = blobs.store(b"malformed audio").await.unwrap();

    let models = Arc::new(FixedModelService::new().failing_transcription("unsupported format"));
    let pipeline = pipeline_with(
        models.clone(),
        Arc::new(StaticConditionsProvider::default()),
        blobs.clone(),
    );

    let err = pipeline.run(Request::voice(blob.clone())).await.unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Intake));
    assert_eq!(capabilities(&models.calls()), vec!["transcribe"]);
    assert!(!blobs.contains(&blob));
}

#[tokio::test]
async fn analysis_generation_failure_names_analysis() {
    let models = Arc::new(
        FixedModelService::new().push_failing_generation("generation backend down"),
    );
    let pipeline = pipeline_with(
        models.clone(),
        Arc::new(StaticConditionsProvider::default()),
        Arc::new(MemoryBlobStore::new()),
    );

    let err = pipeline.run(Request::text("smog")).await.unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Analysis));
    assert_eq!(capabilities(&models.calls()), vec!["generate"]);
}

#[tokio::test]
async fn orchestration_generation_failure_names_orchestration() {
    let models = Arc::new(
        FixedModelService::new()
            .push_generation("AQI forecast: poor")
            .push_failing_generation("generation backend down"),
    );
    let pipeline = pipeline_with(
        models.clone(),
        Arc::new(StaticConditionsProvider::default()),
        Arc::new(MemoryBlobStore::new()),
    );

    let err = pipeline.run(Request::text("smog")).await.unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Orchestration));

    // Analysis succeeded, the final synthesis failed: exactly two generations
    assert_eq!(capabilities(&models.calls()), vec!["generate", "generate"]);
}

#[tokio::test]
async fn identical_scripted_responses_yield_identical_final_responses() {
    let script = || {
        Arc::new(
            FixedModelService::new()
                .push_generation("AQI 180, very unhealthy")
                .push_generation("High pollution today; limit exposure"),
        )
    };

    let mut responses = Vec::new();
    for _ in 0..2 {
        let pipeline = pipeline_with(
            script(),
            Arc::new(StaticConditionsProvider::default()),
            Arc::new(MemoryBlobStore::new()),
        );
        responses.push(
            pipeline
                .run(Request::text("Heavy smog downtown today"))
                .await
                .unwrap(),
        );
    }
    assert_eq!(responses[0], responses[1]);
}

#[tokio::test]
async fn alert_flag_is_set_from_the_final_text() {
    let models = Arc::new(
        FixedModelService::new()
            .push_generation("forecast")
            .push_generation("High pollution detected: keep windows closed"),
    );
    let pipeline = pipeline_with(
        models,
        Arc::new(StaticConditionsProvider::default()),
        Arc::new(MemoryBlobStore::new()),
    );

    let response = pipeline.run(Request::text("thick smog")).await.unwrap();
    assert!(response.alert);
}
