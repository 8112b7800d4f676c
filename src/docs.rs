use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::job::handler::create_job,
        crate::modules::job::handler::list_jobs,
        crate::modules::job::handler::get_job,
        crate::modules::job::handler::cancel_job,
        crate::modules::job::handler::delete_job,
        crate::modules::preset_map::handler::list_preset_maps,
        crate::modules::preset_map::handler::create_preset_map,
        crate::modules::preset_map::handler::get_preset_map,
        crate::modules::preset_map::handler::update_preset_map,
        crate::modules::preset_map::handler::delete_preset_map,
        crate::modules::provider::handler::list_providers,
        crate::modules::provider::handler::get_provider,
    ),
    components(
        schemas(
            crate::modules::job::dto::CreateJobRequest,
            crate::modules::job::dto::JobResponse,
            crate::modules::job::model::Job,
            crate::modules::job::model::StreamingParams,
            crate::modules::preset_map::dto::CreatePresetMapRequest,
            crate::modules::preset_map::dto::UpdatePresetMapRequest,
            crate::modules::preset_map::model::PresetMap,
            crate::modules::preset_map::model::OutputOptions,
            crate::modules::provider::JobStatus,
            crate::modules::provider::dto::ProviderResponse,
        )
    ),
    tags(
        (name = "Jobs", description = "Transcoding jobs"),
        (name = "Presets", description = "Preset maps shared across providers"),
        (name = "Providers", description = "Registered transcoding providers")
    )
)]
pub struct ApiDoc;
