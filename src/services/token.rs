//! Short token generator
//!
//! Produces fixed-length tokens over `[A-Za-z0-9]`, each position drawn
//! independently. Uniqueness is checked by the allocator, not here.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

pub const ALPHABET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

pub struct TokenGenerator {
    rng: Mutex<StdRng>,
}

impl TokenGenerator {
    /// 使用线程随机数播种
    pub fn new() -> Self {
        let mut seed = [0u8; 32];
        rand::rng().fill(&mut seed);
        Self::from_rng(StdRng::from_seed(seed))
    }

    /// 固定种子，生成序列可复现
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    pub fn generate(&self, length: usize) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        (0..length)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect()
    }
}

/// 非空且只含字母数字
pub fn is_token_shaped(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_alphanumeric())
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}
