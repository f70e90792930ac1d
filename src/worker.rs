use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use tokio::sync::{Mutex, watch};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::catalog::CatalogSearch;
use crate::config::DiscoveryConfig;
use crate::filter;
use crate::model::ManualCoupon;
use crate::normalizer;
use crate::notifier::TelegramNotifier;
use crate::notifier::format::{format_coupon, format_promotion};

/// Short fixed wait after a failed catalog fetch, distinct from the
/// randomized inter-cycle interval.
pub const FALLBACK_DELAY: Duration = Duration::from_secs(10);
const BROADCAST_ERROR_BACKOFF: Duration = Duration::from_secs(5);
const SEARCH_PAGE: u32 = 1;

/// How one discovery cycle ended. Stage failures are data, not exceptions;
/// the loop picks the next sleep from this and carries on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A qualifying candidate was found and a delivery attempt was made.
    /// Delivery failure is logged but does not fail the cycle.
    Delivered,
    /// The whole candidate list was exhausted without a qualifying promotion.
    NothingQualified,
    /// The catalog fetch failed; the cycle was cut short.
    SearchFailed,
}

/// The long-lived discovery loop: pick a keyword, search the catalog,
/// normalize and filter the shuffled candidates, deliver at most one
/// message, sleep, repeat until shutdown.
pub struct DiscoveryWorker {
    config: DiscoveryConfig,
    catalog: Arc<dyn CatalogSearch>,
    notifier: Arc<TelegramNotifier>,
}

impl DiscoveryWorker {
    pub fn new(
        config: DiscoveryConfig,
        catalog: Arc<dyn CatalogSearch>,
        notifier: Arc<TelegramNotifier>,
    ) -> Self {
        Self {
            config,
            catalog,
            notifier,
        }
    }

    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!("discovery worker started ({} keywords)", self.config.keywords.len());
        loop {
            let outcome = self.run_cycle().await;
            let delay = match outcome {
                CycleOutcome::SearchFailed => FALLBACK_DELAY,
                CycleOutcome::Delivered | CycleOutcome::NothingQualified => self.random_interval(),
            };
            info!("cycle outcome {outcome:?}, sleeping {}s", delay.as_secs());
            tokio::select! {
                _ = sleep(delay) => {}
                _ = shutdown.changed() => {
                    info!("discovery worker stopping");
                    return;
                }
            }
        }
    }

    /// One full pass from keyword selection to send-or-skip. Never panics;
    /// every stage failure folds into the returned outcome.
    pub async fn run_cycle(&self) -> CycleOutcome {
        let keyword = self.pick_keyword();
        info!("searching catalog for '{keyword}'");

        let response = match self
            .catalog
            .search(&keyword, &self.config.country, SEARCH_PAGE)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("catalog search for '{keyword}' failed: {e}");
                return CycleOutcome::SearchFailed;
            }
        };

        let mut candidates = normalizer::extract_candidates(&response);
        info!("{} candidates for '{keyword}'", candidates.len());
        // shuffle so repeated cycles do not always pick the provider's
        // first-ranked item
        candidates.shuffle(&mut rand::rng());

        for candidate in &candidates {
            let product = normalizer::normalize(candidate);
            if !product.is_eligible() {
                continue;
            }
            let decision = filter::evaluate(&product, self.config.min_discount_percent);
            if !decision.qualifies {
                continue;
            }

            info!("qualifying promotion: {} at {}", product.title, product.price);
            if let Err(e) = self.notifier.send_text(&format_promotion(&product, &decision)).await {
                warn!("delivery failed: {e}");
            }
            return CycleOutcome::Delivered;
        }

        CycleOutcome::NothingQualified
    }

    fn pick_keyword(&self) -> String {
        self.config
            .keywords
            .choose(&mut rand::rng())
            .cloned()
            .unwrap_or_default()
    }

    fn random_interval(&self) -> Duration {
        let min = self.config.min_interval.as_secs();
        let max = self.config.max_interval.as_secs();
        Duration::from_secs(rand::rng().random_range(min..=max))
    }
}

/// Legacy deployment mode: round-robin broadcast of the manually submitted
/// coupon list at a fixed interval.
pub struct BroadcastWorker {
    coupons: Arc<Mutex<Vec<ManualCoupon>>>,
    notifier: Arc<TelegramNotifier>,
    send_interval: Duration,
}

impl BroadcastWorker {
    pub fn new(
        coupons: Arc<Mutex<Vec<ManualCoupon>>>,
        notifier: Arc<TelegramNotifier>,
        send_interval: Duration,
    ) -> Self {
        Self {
            coupons,
            notifier,
            send_interval,
        }
    }

    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!("broadcast worker started");
        let mut cursor: usize = 0;
        loop {
            let next = {
                let coupons = self.coupons.lock().await;
                if coupons.is_empty() {
                    None
                } else {
                    Some(coupons[cursor % coupons.len()].clone())
                }
            };

            let delay = match next {
                None => self.send_interval,
                Some(coupon) => {
                    cursor = cursor.wrapping_add(1);
                    match self.notifier.send_text(&format_coupon(&coupon)).await {
                        Ok(()) => self.send_interval,
                        Err(e) => {
                            warn!("coupon broadcast failed: {e}");
                            BROADCAST_ERROR_BACKOFF
                        }
                    }
                }
            };

            tokio::select! {
                _ = sleep(delay) => {}
                _ = shutdown.changed() => {
                    info!("broadcast worker stopping");
                    return;
                }
            }
        }
    }
}
