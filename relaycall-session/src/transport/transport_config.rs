use relaycall_core::IceServerConfig;

#[derive(Debug, Clone, Default)]
pub struct TransportConfig {
    pub ice_servers: Vec<IceServerConfig>,
}
