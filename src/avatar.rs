//! Deterministic presentation hints for breed list rows.
//!
//! A breed keeps the same avatar color and emoji across renders because both
//! derive from a stable hash of its name; row backgrounds alternate by list
//! position.

use crate::api::Breed;

pub const AVATAR_COLORS: [&str; 6] = ["pink", "purple", "blue", "green", "yellow", "orange"];

pub const DOG_EMOJIS: [&str; 5] = ["\u{1F415}", "\u{1F429}", "\u{1F9AE}", "\u{1F415}\u{200D}\u{1F9BA}", "\u{1F436}"];

pub const ROW_COLORS: [&str; 2] = ["white", "cream"];

fn name_hash(name: &str) -> u32 {
    name.chars().fold(0u32, |sum, c| sum.wrapping_add(c as u32))
}

pub fn avatar_color(name: &str) -> &'static str {
    AVATAR_COLORS[name_hash(name) as usize % AVATAR_COLORS.len()]
}

pub fn dog_emoji(name: &str) -> &'static str {
    DOG_EMOJIS[name_hash(name) as usize % DOG_EMOJIS.len()]
}

pub fn row_color(index: usize) -> &'static str {
    ROW_COLORS[index % ROW_COLORS.len()]
}

/// Secondary row text, absent when the breed has no sub-breeds.
pub fn sub_breed_summary(breed: &Breed) -> Option<String> {
    match breed.sub_breeds.len() {
        0 => None,
        1 => Some("1 sub-breed".to_string()),
        n => Some(format!("{n} sub-breeds")),
    }
}
