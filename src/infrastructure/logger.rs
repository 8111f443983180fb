//! 日志基础设施

use anyhow::Result;
use std::io;
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

pub struct Logger;

impl Logger {
    /// 初始化日志系统
    ///
    /// - 级别取自 `RUST_LOG`，未设置时使用配置中的 `level`
    /// - `console_output` 为真时输出到控制台
    /// - 配置了 `log_dir` 时额外写入按日期分割的日志文件
    ///
    /// 返回文件写入器的 guard，调用方需要持有它直到进程退出，
    /// 否则缓冲中的日志会丢失。
    pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.level))?;

        let console_layer = config
            .console_output
            .then(|| fmt::layer().with_writer(io::stdout).with_ansi(true));

        let (file_layer, guard) = match &config.log_dir {
            Some(log_dir) => {
                std::fs::create_dir_all(log_dir)?;
                let file_appender = rolling::daily(log_dir, &config.file_prefix);
                let (writer, guard) = non_blocking(file_appender);
                let layer = fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false) // 文件中不使用颜色
                    .with_target(false)
                    .with_thread_names(true);
                (Some(layer), Some(guard))
            }
            None => (None, None),
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(console_layer)
            .with(file_layer)
            .try_init()?;

        Ok(guard)
    }

    /// 命令行工具使用：只输出到 stderr，避免干扰标准输出
    pub fn init_stderr(level: &str) -> Result<()> {
        let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(io::stderr).with_target(false))
            .try_init()?;

        Ok(())
    }
}
