use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 日誌輸出格式與等級
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOutput {
    /// 給人看的單行輸出
    Compact { level: String },
    /// 結構化輸出，給 log 收集器使用
    Json { level: String },
}

impl LogOutput {
    pub fn level(&self) -> &str {
        match self {
            LogOutput::Compact { level } | LogOutput::Json { level } => level,
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("goodspace_storefront={}", self.level())))
    }
}

pub fn init(output: &LogOutput) {
    let layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);

    match output {
        LogOutput::Compact { .. } => tracing_subscriber::registry()
            .with(output.filter())
            .with(layer.compact())
            .init(),
        LogOutput::Json { .. } => tracing_subscriber::registry()
            .with(output.filter())
            .with(layer.json())
            .init(),
    }
}

/// 設定檔還沒讀到時用的預設輸出
pub fn init_cli_logger(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    init(&LogOutput::Compact {
        level: level.to_string(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_is_shared_by_both_outputs() {
        let compact = LogOutput::Compact {
            level: "warn".to_string(),
        };
        let json = LogOutput::Json {
            level: "info".to_string(),
        };
        assert_eq!(compact.level(), "warn");
        assert_eq!(json.level(), "info");
    }
}
