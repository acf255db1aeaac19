use serde::{Deserialize, Serialize};

use crate::errors::{Result, ShortlyError};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 环境变量前缀，分隔符为 `__`
pub const ENV_PREFIX: &str = "SHORTLY";

/// 静态配置（从 TOML 加载，启动时使用）
///
/// 包含：
/// - server: 监听地址、端口、API 前缀
/// - links: 短码生成与批量创建限制
/// - clicks: 点击记录相关设置
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub links: LinkSettings,
    #[serde(default)]
    pub clicks: ClickSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// 示例：SHORTLY__LINKS__BASE_URL=https://s.example.com
    pub fn load(path: &str) -> Result<Self> {
        use config::{Config, Environment, File};

        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: StaticConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 检查配置取值是否合理
    pub fn validate(&self) -> Result<()> {
        let links = &self.links;
        if links.alphabet.is_empty() {
            return Err(ShortlyError::config("links.alphabet must not be empty"));
        }
        if !links.alphabet.chars().all(crate::utils::is_code_char) {
            return Err(ShortlyError::config(
                "links.alphabet may only contain letters, digits, '-' and '_'",
            ));
        }
        if links.random_code_length == 0 {
            return Err(ShortlyError::config("links.random_code_length must be positive"));
        }
        if links.max_generation_attempts == 0 {
            return Err(ShortlyError::config(
                "links.max_generation_attempts must be positive",
            ));
        }
        if links.min_code_length == 0 || links.min_code_length > links.max_code_length {
            return Err(ShortlyError::config(format!(
                "invalid code length bounds: {}..={}",
                links.min_code_length, links.max_code_length
            )));
        }
        if links.max_batch_rows == 0 {
            return Err(ShortlyError::config("links.max_batch_rows must be positive"));
        }
        if self.clicks.retention_limit == Some(0) {
            return Err(ShortlyError::config(
                "clicks.retention_limit must be positive when set",
            ));
        }
        Ok(())
    }

    /// 实际用于创建链接的设置
    ///
    /// API 前缀的第一段会被加入保留短码，否则该短码的跳转会被 API 路由吞掉。
    pub fn link_settings(&self) -> LinkSettings {
        let mut links = self.links.clone();
        if let Some(segment) = self
            .server
            .api_prefix
            .trim_matches('/')
            .split('/')
            .next()
            .filter(|s| !s.is_empty())
            && !links.reserved_codes.iter().any(|c| c == segment)
        {
            links.reserved_codes.push(segment.to_string());
        }
        links
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> Result<String> {
        Ok(toml::to_string_pretty(&Self::default())?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_prefix: default_api_prefix(),
        }
    }
}

/// 短链接创建相关设置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkSettings {
    /// 短链接展示前缀，形如 `<base_url>/<code>`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_random_code_length")]
    pub random_code_length: usize,
    /// 随机短码字母表（去掉了 0 O 1 l I 等易混字符）
    #[serde(default = "default_alphabet")]
    pub alphabet: String,
    /// 随机短码碰撞后的最大尝试次数
    #[serde(default = "default_max_generation_attempts")]
    pub max_generation_attempts: usize,
    #[serde(default = "default_min_code_length")]
    pub min_code_length: usize,
    #[serde(default = "default_max_code_length")]
    pub max_code_length: usize,
    #[serde(default = "default_max_batch_rows")]
    pub max_batch_rows: usize,
    /// 不允许被占用的短码（例如与路由冲突的路径段）
    #[serde(default)]
    pub reserved_codes: Vec<String>,
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            random_code_length: default_random_code_length(),
            alphabet: default_alphabet(),
            max_generation_attempts: default_max_generation_attempts(),
            min_code_length: default_min_code_length(),
            max_code_length: default_max_code_length(),
            max_batch_rows: default_max_batch_rows(),
            reserved_codes: Vec::new(),
        }
    }
}

/// 点击记录设置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClickSettings {
    /// 每个链接保留的最近点击事件数，None 表示不限
    ///
    /// 只裁剪事件日志，click_count 仍然统计全部点击。
    #[serde(default)]
    pub retention_limit: Option<usize>,
    /// 读取访问者地理位置的请求头
    #[serde(default = "default_location_header")]
    pub location_header: String,
}

impl Default for ClickSettings {
    fn default() -> Self {
        Self {
            retention_limit: None,
            location_header: default_location_header(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// "text" 或 "json"
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            enable_rotation: default_enable_rotation(),
            max_backups: default_max_backups(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_api_prefix() -> String {
    "/api".to_string()
}

fn default_base_url() -> String {
    "https://short.ly".to_string()
}

fn default_random_code_length() -> usize {
    6
}

fn default_alphabet() -> String {
    "ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz23456789".to_string()
}

fn default_max_generation_attempts() -> usize {
    10
}

fn default_min_code_length() -> usize {
    3
}

fn default_max_code_length() -> usize {
    20
}

fn default_max_batch_rows() -> usize {
    5
}

fn default_location_header() -> String {
    "CF-IPCountry".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_enable_rotation() -> bool {
    true
}

fn default_max_backups() -> u32 {
    5
}
