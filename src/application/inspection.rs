//! The inspection log: a console dump of everything a client sent.

use std::fmt::Write;
use std::io;
use time::macros::format_description;
use time::OffsetDateTime;

use crate::application::body::{decode_json, lossy_text, pretty_json};
use crate::application::query::{split_target, QueryParams};
use crate::infrastructure::server_impl::request::InspectedRequest;

const SEPARATOR_WIDTH: usize = 80;

fn separator() -> String {
    "=".repeat(SEPARATOR_WIDTH)
}

fn received_at(at: OffsetDateTime) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    at.format(&format)
        .unwrap_or_else(|_| at.unix_timestamp().to_string())
}

/// Renders the full inspection log for `request` as one block of text.
pub fn render(request: &InspectedRequest<'_>, at: OffsetDateTime) -> String {
    let mut out = String::with_capacity(1024);
    let separator = separator();
    let (path, query) = split_target(request.target);

    // writing into a String cannot fail
    let _ = writeln!(out, "\n{separator}");
    let _ = writeln!(out, "[{}] リクエスト受信", received_at(at));
    let _ = writeln!(out, "{separator}");

    let _ = writeln!(out, "\n📌 メソッド: {}", request.method);

    let _ = writeln!(out, "\n🔗 URL情報:");
    let _ = writeln!(out, "   完全パス: {}", request.target);
    let _ = writeln!(out, "   パス: {path}");

    let params = query.map(QueryParams::parse).unwrap_or_default();
    if params.is_empty() {
        let _ = writeln!(out, "\n🔍 クエリパラメータ: なし");
    } else {
        let _ = writeln!(out, "\n🔍 クエリパラメータ:");
        for (key, value) in params.pairs() {
            let _ = writeln!(out, "   {key} = {value}");
        }
    }

    let _ = writeln!(out, "\n📋 ヘッダー:");
    for (name, value) in &request.headers {
        let _ = writeln!(out, "   {name}: {value}");
    }

    match request.content_length {
        Some(size) => {
            let body = request.body.unwrap_or_default();
            let _ = writeln!(out, "\n📦 ボディ:");
            let _ = writeln!(out, "   サイズ: {size} bytes");

            let json = request.is_json().then(|| decode_json(body).ok()).flatten();
            match json {
                Some(value) => {
                    let _ = writeln!(out, "   JSON:");
                    let _ = writeln!(out, "   {}", pretty_json(&value));
                }
                None => {
                    let _ = writeln!(out, "   Raw: {}", lossy_text(body));
                }
            }
        }
        None => {
            let _ = writeln!(out, "\n📦 ボディ: なし");
        }
    }

    let _ = writeln!(out, "\n{separator}");
    out
}

/// Writes a rendered log followed by a newline in one `write_all`.
pub fn write_to<W: io::Write>(out: &mut W, inspection: &str) -> io::Result<()> {
    let mut block = String::with_capacity(inspection.len() + 1);
    block.push_str(inspection);
    block.push('\n');
    out.write_all(block.as_bytes())?;
    out.flush()
}

/// Sends a rendered log to stdout while holding the stdout lock, so blocks from concurrent
/// requests never interleave line by line.
pub fn emit(inspection: &str) -> io::Result<()> {
    write_to(&mut io::stdout().lock(), inspection)
}
