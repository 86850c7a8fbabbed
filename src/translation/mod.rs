/*!
 * Translation of transcript segments using AI providers.
 *
 * - `core`: the `Translator` seam and the provider-backed `TranslationService`
 * - `cache`: reuse of translations for repeated segment text
 */

// Re-export main types for easier usage
pub use self::cache::TranslationCache;
pub use self::core::{TranslationService, Translator};

// Submodules
pub mod cache;
pub mod core;
