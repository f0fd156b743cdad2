use ort::execution_providers::ExecutionProviderDispatch;

/// Hardware-accelerated providers to try before ONNX Runtime's CPU default.
///
/// Registration failures are non-fatal in ort, so the detector still loads
/// on machines without CoreML or DirectML.
pub fn preferred_execution_providers() -> Vec<ExecutionProviderDispatch> {
    let providers = platform_providers();
    log::debug!(
        "Registering {} accelerated execution provider(s)",
        providers.len()
    );
    providers
}

#[cfg(target_os = "macos")]
fn platform_providers() -> Vec<ExecutionProviderDispatch> {
    vec![ort::execution_providers::CoreMLExecutionProvider::default().build()]
}

#[cfg(target_os = "windows")]
fn platform_providers() -> Vec<ExecutionProviderDispatch> {
    vec![ort::execution_providers::DirectMLExecutionProvider::default().build()]
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn platform_providers() -> Vec<ExecutionProviderDispatch> {
    Vec::new()
}
