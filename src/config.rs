use clap::Parser;
use std::fmt::Write;

/// Diagnostic HTTP server that prints every request it receives.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(version, about)]
pub struct Config {
    /// Host name or address to bind.
    #[arg(long, default_value = "localhost")]
    pub host: String,

    #[arg(short, long, default_value_t = 8000)]
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8000,
        }
    }
}

impl Config {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn banner(&self) -> String {
        let separator = "=".repeat(80);
        let address = self.address();
        let mut out = String::new();

        let _ = writeln!(out, "\n{separator}");
        let _ = writeln!(out, "🚀 APIリクエスト検証用サーバーを起動しました");
        let _ = writeln!(out, "{separator}");
        let _ = writeln!(out, "\n📍 サーバーアドレス: http://{address}");
        let _ = writeln!(out, "\n💡 使用方法:");
        let _ = writeln!(out, "   curl http://{address}/api/test");
        let _ = writeln!(
            out,
            "   curl -X POST http://{address}/api/test -H 'Content-Type: application/json' -d '{{\"key\":\"value\"}}'"
        );
        let _ = writeln!(out, "\n⚠️  終了するには Ctrl+C を押してください");
        let _ = writeln!(out, "\n{separator}");
        out
    }
}
