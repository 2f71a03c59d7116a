//! フォームキャッシュのlocalStorage連携
//!
//! 保存は最後の変更から1秒のデバウンス、ページ離脱時は即時保存。
//! 失敗はすべてコンソールに記録するだけでユーザーには見せない。

use api_forge_common::{cache, CacheDecision, CacheSnapshot, FormState, CACHE_KEY};
use chrono::Utc;
use gloo::storage::{LocalStorage, Storage};

fn warn(message: &str) {
    web_sys::console::warn_1(&message.into());
}

/// スナップショットを即時保存する
pub fn save_now(form: &FormState) {
    let snapshot = CacheSnapshot::from_form(form, Utc::now());
    match cache::encode(&snapshot) {
        Ok(raw) => {
            if let Err(e) = LocalStorage::raw().set_item(CACHE_KEY, &raw) {
                warn(&format!("フォームキャッシュの保存に失敗: {:?}", e));
            }
        }
        Err(e) => warn(&format!("フォームキャッシュの保存に失敗: {}", e)),
    }
}

/// ページ読み込み時のキャッシュ復元
///
/// 7日より古い(または壊れた)エントリは削除してNoneを返す。
pub fn load() -> Option<CacheSnapshot> {
    let raw = match LocalStorage::raw().get_item(CACHE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn(&format!("フォームキャッシュの読込に失敗: {:?}", e));
            return None;
        }
    };

    match cache::decode(&raw, Utc::now()) {
        Ok(CacheDecision::Apply(snapshot)) => Some(*snapshot),
        Ok(CacheDecision::Expired) => {
            if let Err(e) = LocalStorage::raw().remove_item(CACHE_KEY) {
                warn(&format!("期限切れキャッシュの削除に失敗: {:?}", e));
            }
            None
        }
        Err(e) => {
            warn(&format!("フォームキャッシュの読込に失敗: {}", e));
            None
        }
    }
}
