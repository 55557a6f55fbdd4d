pub mod api_transport_trait;
pub mod datadog_client;

#[cfg(test)]
pub mod recording_transport;
