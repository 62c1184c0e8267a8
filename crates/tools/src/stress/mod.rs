//! 階層キャッシュの擬似対局ドライバ
//!
//! ランダムな駒移動・壁置きで対局を進め、探索の代わりに子局面を
//! キャッシュへ問い合わせる。壁が置かれるたびに進行度を進め、
//! メモリ予算を超えたら階層を捨てる。

pub mod game;
pub mod types;

pub use game::{run, run_game};
pub use types::{StressConfig, StressFile, StressStats};
