//! 评分进度文案轮播 - 业务能力层
//!
//! 评分请求是一次性的请求/响应，没有真实进度。这里只是按固定间隔切换展示文案。
//! `StatusCycler` 是一个作用域守卫：创建时启动后台任务，释放时立即中止，
//! 请求结束（无论成功失败）后不会再有任何一次切换。

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// 一个展示用的评分阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadingPhase {
    pub id: &'static str,
    pub text: &'static str,
    pub subtext: &'static str,
}

/// 固定的阶段列表，按顺序循环
pub const LOADING_PHASES: [LoadingPhase; 5] = [
    LoadingPhase {
        id: "analyze",
        text: "Analyzing Structure...",
        subtext: "Reading the student's submission.",
    },
    LoadingPhase {
        id: "context",
        text: "Retrieving Context...",
        subtext: "Fetching relevant knowledge from course materials.",
    },
    LoadingPhase {
        id: "grade",
        text: "Applying Rubric...",
        subtext: "Checking criteria matches against evidence.",
    },
    LoadingPhase {
        id: "judge",
        text: "Judge Validating...",
        subtext: "Self-correcting loop: ensuring fairness and accuracy.",
    },
    LoadingPhase {
        id: "refine",
        text: "Refining Feedback...",
        subtext: "Polishing guidance for the student.",
    },
];

/// 进度文案轮播器
///
/// 必须在 tokio 运行时中创建。
pub struct StatusCycler {
    ticker: Option<JoinHandle<()>>,
}

impl StatusCycler {
    /// 立即展示第一个阶段，之后每隔 `interval` 切换到下一个
    ///
    /// # 参数
    /// - `interval`: 切换间隔
    /// - `on_phase`: 每次切换时回调（包括启动时的第一次）
    pub fn start<F>(interval: Duration, on_phase: F) -> Self
    where
        F: Fn(LoadingPhase) + Send + Sync + 'static,
    {
        let on_phase = Arc::new(on_phase);
        on_phase(LOADING_PHASES[0]);

        let ticker = tokio::spawn(async move {
            let mut index = 0;
            loop {
                tokio::time::sleep(interval).await;
                index = (index + 1) % LOADING_PHASES.len();
                debug!("评分进度: {}", LOADING_PHASES[index].text);
                on_phase(LOADING_PHASES[index]);
            }
        });

        Self {
            ticker: Some(ticker),
        }
    }

    /// 停止轮播，可重复调用
    pub fn stop(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }
}

impl Drop for StatusCycler {
    fn drop(&mut self) {
        self.stop();
    }
}
