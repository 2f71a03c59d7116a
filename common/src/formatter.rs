//! ペイロード整形
//!
//! 先頭の非空白文字で書式を判定する: `{`/`[`はJSON、`<`はXML、それ以外は
//! 変更しない。XMLは文法を解釈しない行ベースの再インデントで、既存入力に
//! 対する出力をそのまま保つためにあえてこのヒューリスティックを維持する。

use crate::error::Result;
use lazy_static::lazy_static;
use regex::Regex;

/// 整形結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formatted {
    Json(String),
    Xml(String),
    /// JSONでもXMLでもない入力。フィールドは変更しない
    Untouched,
}

/// ペイロード文字列を整形する
///
/// JSONの解析に失敗した場合はエラーを返し、呼び出し側は通知だけ出して
/// フィールドを変更しない。
pub fn format_payload(input: &str) -> Result<Formatted> {
    let trimmed = input.trim();
    match trimmed.chars().next() {
        Some('{') | Some('[') => {
            let value: serde_json::Value = serde_json::from_str(trimmed)?;
            Ok(Formatted::Json(serde_json::to_string_pretty(&value)?))
        }
        Some('<') => Ok(Formatted::Xml(reindent_xml(trimmed))),
        _ => Ok(Formatted::Untouched),
    }
}

/// 行ベースのXML再インデント
///
/// `>`と`<`の間に改行を挿入した後、各行を3パターンで分類する:
/// 行末に閉じタグを含む行はレベル据え置き、閉じタグで始まる行は出力前に
/// 1段戻す(0未満にはしない)、自己終了でない開きタグの行は出力後に1段
/// 進める。インデント幅は2スペース、行は`\r\n`で連結する。
pub fn reindent_xml(xml: &str) -> String {
    lazy_static! {
        static ref TAG_BREAK: Regex = Regex::new(r"(>)(<)(/*)").unwrap();
        static ref CLOSE_AT_END: Regex = Regex::new(r".+</\w[^>]*>$").unwrap();
        static ref CLOSE_AT_START: Regex = Regex::new(r"^</\w").unwrap();
        static ref OPEN_TAG: Regex = Regex::new(r"^<\w([^>]*[^/])?>.*$").unwrap();
    }

    let broken = TAG_BREAK.replace_all(xml, "${1}\r\n${2}${3}");

    let mut formatted = String::new();
    let mut pad: usize = 0;
    for line in broken.split("\r\n") {
        let mut indent = 0;
        if CLOSE_AT_END.is_match(line) {
            // 開きと閉じが1行に揃っている
        } else if CLOSE_AT_START.is_match(line) {
            if pad != 0 {
                pad -= 1;
            }
        } else if OPEN_TAG.is_match(line) {
            indent = 1;
        }

        formatted.push_str(&"  ".repeat(pad));
        formatted.push_str(line);
        formatted.push_str("\r\n");
        pad += indent;
    }

    formatted.trim().to_string()
}

/// 表示用の整形。JSONとして解釈できれば整形JSON、XMLらしければ再インデント、
/// どちらでもなければトリムした原文を返す
pub fn pretty_or_raw(raw: &str) -> String {
    if raw.is_empty() {
        return "[Empty]".to_string();
    }
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(raw) {
        if let Ok(pretty) = serde_json::to_string_pretty(&value) {
            return pretty;
        }
    }
    let trimmed = raw.trim();
    if trimmed.starts_with('<') && trimmed.ends_with('>') {
        return reindent_xml(trimmed);
    }
    trimmed.to_string()
}
