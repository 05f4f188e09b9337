//! Themed announcements for counters that land on notable values

use once_cell::sync::Lazy;

type Render = fn(&str, u64) -> String;

const SET_114514: &[u64] = &[114, 1145, 11451, 114514];
const SET_1919: &[u64] = &[1919, 19191, 191919];
const SET_LOVE: &[u64] = &[520, 1314];
const SET_666: &[u64] = &[6, 66, 666, 6666];
const SET_233: &[u64] = &[233, 2333, 23333];
const SET_ROUND: &[u64] = &[100, 1000, 10_000, 100_000];

/// Value sets with a themed reply. Static configuration, checked only when
/// a message bumped exactly one counter.
static MILESTONES: Lazy<Vec<(&'static [u64], Render)>> = Lazy::new(|| {
    vec![
        (SET_114514, msg_114514 as Render),
        (SET_1919, msg_1919 as Render),
        (SET_LOVE, msg_love as Render),
        (SET_666, msg_666 as Render),
        (SET_233, msg_233 as Render),
        (SET_ROUND, msg_round as Render),
    ]
});

fn msg_114514(name: &str, count: u64) -> String {
    format!("💥 '{}' just hit {}. Yarimasune!", name, count)
}

fn msg_1919(name: &str, count: u64) -> String {
    format!("🚄 '{}' is at {}. Ikisugi!", name, count)
}

fn msg_love(name: &str, count: u64) -> String {
    format!("💕 '{}' reached {}, a number full of love.", name, count)
}

fn msg_666(name: &str, count: u64) -> String {
    format!("👍 '{}' rolled up to {}. 666!", name, count)
}

fn msg_233(_name: &str, _count: u64) -> String {
    "😂 23333333!".to_string()
}

fn msg_round(name: &str, count: u64) -> String {
    format!("🎉 Congratulations! '{}' has reached {}!", name, count)
}

/// Themed message for a counter that just reached a milestone value.
/// Returns None for ordinary values.
pub fn milestone_message(name: &str, count: u64) -> Option<String> {
    MILESTONES
        .iter()
        .find(|(values, _)| values.contains(&count))
        .map(|(_, render)| render(name, count))
}
