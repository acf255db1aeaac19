use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortlyError {
    InvalidUrl(String),
    InvalidValidity(String),
    InvalidCode(String),
    CodeConflict(String),
    GenerationExhausted(String),
    UnknownCode(String),
    TooManyRows(String),
    Config(String),
    FileOperation(String),
}

/// 各组件契约中的错误类型都是同一个枚举
pub type CodeError = ShortlyError;
pub type RegistryError = ShortlyError;
pub type RecorderError = ShortlyError;
pub type StatsError = ShortlyError;

impl ShortlyError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ShortlyError::InvalidUrl(_) => "E101",
            ShortlyError::InvalidValidity(_) => "E102",
            ShortlyError::InvalidCode(_) => "E103",
            ShortlyError::CodeConflict(_) => "E104",
            ShortlyError::GenerationExhausted(_) => "E105",
            ShortlyError::UnknownCode(_) => "E106",
            ShortlyError::TooManyRows(_) => "E107",
            ShortlyError::Config(_) => "E201",
            ShortlyError::FileOperation(_) => "E202",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ShortlyError::InvalidUrl(_) => "Invalid URL",
            ShortlyError::InvalidValidity(_) => "Invalid Validity",
            ShortlyError::InvalidCode(_) => "Invalid Short Code",
            ShortlyError::CodeConflict(_) => "Short Code Conflict",
            ShortlyError::GenerationExhausted(_) => "Code Generation Exhausted",
            ShortlyError::UnknownCode(_) => "Unknown Short Code",
            ShortlyError::TooManyRows(_) => "Too Many Rows",
            ShortlyError::Config(_) => "Configuration Error",
            ShortlyError::FileOperation(_) => "File Operation Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            ShortlyError::InvalidUrl(msg)
            | ShortlyError::InvalidValidity(msg)
            | ShortlyError::InvalidCode(msg)
            | ShortlyError::CodeConflict(msg)
            | ShortlyError::GenerationExhausted(msg)
            | ShortlyError::UnknownCode(msg)
            | ShortlyError::TooManyRows(msg)
            | ShortlyError::Config(msg)
            | ShortlyError::FileOperation(msg) => msg,
        }
    }

    /// 调用方输入导致的错误（相对于服务端自身的错误）
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            ShortlyError::GenerationExhausted(_)
                | ShortlyError::Config(_)
                | ShortlyError::FileOperation(_)
        )
    }

    /// 格式化为彩色输出（用于 Server 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ShortlyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ShortlyError {}

// 便捷的构造函数
impl ShortlyError {
    pub fn invalid_url<T: Into<String>>(msg: T) -> Self {
        ShortlyError::InvalidUrl(msg.into())
    }

    pub fn invalid_validity<T: Into<String>>(msg: T) -> Self {
        ShortlyError::InvalidValidity(msg.into())
    }

    pub fn invalid_code<T: Into<String>>(msg: T) -> Self {
        ShortlyError::InvalidCode(msg.into())
    }

    pub fn code_conflict<T: Into<String>>(msg: T) -> Self {
        ShortlyError::CodeConflict(msg.into())
    }

    pub fn generation_exhausted<T: Into<String>>(msg: T) -> Self {
        ShortlyError::GenerationExhausted(msg.into())
    }

    pub fn unknown_code<T: Into<String>>(msg: T) -> Self {
        ShortlyError::UnknownCode(msg.into())
    }

    pub fn too_many_rows<T: Into<String>>(msg: T) -> Self {
        ShortlyError::TooManyRows(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        ShortlyError::Config(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        ShortlyError::FileOperation(msg.into())
    }
}

impl From<std::io::Error> for ShortlyError {
    fn from(err: std::io::Error) -> Self {
        ShortlyError::FileOperation(err.to_string())
    }
}

impl From<config::ConfigError> for ShortlyError {
    fn from(err: config::ConfigError) -> Self {
        ShortlyError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for ShortlyError {
    fn from(err: toml::ser::Error) -> Self {
        ShortlyError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShortlyError>;
