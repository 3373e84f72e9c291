pub(crate) const DEFAULT_TARGET_HOST: &str = "127.0.0.1:8000";
pub(crate) const DEFAULT_AGENT_PORT: u16 = 5001;
pub(crate) const DEFAULT_LOAD_THREADS: &str = "16";
pub(crate) const DEFAULT_LT_THREADS: &str = "8";
pub(crate) const DEFAULT_CONNECTIONS: &str = "256";
pub(crate) const DEFAULT_IDIST: &str = "exp";
/// Memcached binary protocol, fixed 19-byte keys, 2-byte values, 1M keys, 99.8% reads.
pub(crate) const DEFAULT_APP_PROTO: &str = "bmc_fixed:19_fixed:2_1000000_0.998";
pub(crate) const DEFAULT_LATENCY_RATE: &str = "16000";
pub(crate) const DEFAULT_LOAD_PATTERN: &str = "step:10000:100000:50000";
pub(crate) const DEFAULT_CI_SIZE_US: &str = "5";
pub(crate) const DEFAULT_KEY_COUNT: u32 = 100_000;
pub(crate) const DEFAULT_MAX_TRIES: &str = "20";
