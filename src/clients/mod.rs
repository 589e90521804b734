pub mod gateway;
pub mod gateway_client;

pub use gateway::GradingGateway;
pub use gateway_client::GatewayClient;
