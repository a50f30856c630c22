use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use rand::seq::IndexedRandom;
use serde::de::DeserializeOwned;
use tably_core::{Result, TablyErr};

use crate::registry::Registry;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// How long a resolved address set stays warm.
    pub ttl: Duration,
    /// Bound on each downstream call.
    pub call_timeout: Duration,
    /// Static `host:port` used when resolution fails. Never cached; while the
    /// registry keeps failing every call re-attempts resolution.
    pub fallback: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(30),
            call_timeout: Duration::from_secs(5),
            fallback: None,
        }
    }
}

/// Resolution cache state for one downstream service name.
pub enum CacheState {
    Cold,
    Warm { addrs: Vec<String>, expires: Instant },
}

/// Client for one downstream service. Resolves the service through the
/// registry, keeps the address set warm for the configured TTL and performs
/// the actual HTTP calls. Calls are single-attempt; retry policy belongs to
/// the caller.
pub struct ServiceClient {
    service_name: String,
    registry: Arc<dyn Registry>,
    http: reqwest::Client,
    cache: RwLock<CacheState>,
    config: ClientConfig,
}

impl ServiceClient {
    pub fn new(service_name: impl Into<String>, registry: Arc<dyn Registry>) -> Result<Self> {
        Self::with_config(service_name, registry, ClientConfig::default())
    }

    pub fn with_config(
        service_name: impl Into<String>,
        registry: Arc<dyn Registry>,
        config: ClientConfig,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.call_timeout)
            .build()
            .map_err(|e| TablyErr::transport(e.to_string()))?;
        Ok(Self {
            service_name: service_name.into(),
            registry,
            http,
            cache: RwLock::new(CacheState::Cold),
            config,
        })
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    fn cached_addr(&self) -> Option<String> {
        let state = self.cache.read().unwrap();
        match &*state {
            CacheState::Warm { addrs, expires } if Instant::now() < *expires => {
                addrs.choose(&mut rand::rng()).cloned()
            }
            // expired entries are never extended; the next caller resolves
            _ => None,
        }
    }

    /// One `host:port` for the downstream service, cache-first. Concurrent
    /// cold callers may resolve in parallel; the last published result wins,
    /// which is an accepted cost at this call volume. The registry round trip
    /// happens outside the cache lock.
    async fn resolve_addr(&self) -> Result<String> {
        if let Some(addr) = self.cached_addr() {
            return Ok(addr);
        }

        match self.registry.resolve(&self.service_name).await {
            Ok(addrs) => {
                let picked = addrs
                    .choose(&mut rand::rng())
                    .cloned()
                    .ok_or_else(|| TablyErr::resolution(format!("{}: empty address set", self.service_name)))?;
                let mut state = self.cache.write().unwrap();
                *state = CacheState::Warm {
                    addrs,
                    expires: Instant::now() + self.config.ttl,
                };
                Ok(picked)
            }
            Err(e) => match &self.config.fallback {
                Some(addr) => {
                    log::warn!(
                        "resolving {} failed ({e}), using fallback {addr}",
                        self.service_name
                    );
                    Ok(addr.clone())
                }
                None => Err(TablyErr::resolution(format!("{}: {e}", self.service_name))),
            },
        }
    }

    /// Resolved base URL, for diagnostics.
    pub async fn resolved_base(&self) -> Result<String> {
        Ok(format!("http://{}", self.resolve_addr().await?))
    }

    /// GET `path` on the resolved instance and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let base = self.resolved_base().await?;
        let url = format!("{base}{path}");

        let resp = self.http.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                TablyErr::timeout(format!("GET {url}: {e}"))
            } else {
                TablyErr::transport(format!("GET {url}: {e}"))
            }
        })?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(TablyErr::not_found(format!("GET {url} -> 404")));
        }
        if !status.is_success() {
            return Err(TablyErr::transport(format!("GET {url} -> {status}")));
        }

        resp.json::<T>()
            .await
            .map_err(|e| TablyErr::decode(format!("GET {url}: {e}")))
    }

    /// Probe the downstream `/healthz` endpoint; returns the status code.
    pub async fn health(&self) -> Result<u16> {
        let base = self.resolved_base().await?;
        let url = format!("{base}/healthz");
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| TablyErr::transport(format!("GET {url}: {e}")))?;
        Ok(resp.status().as_u16())
    }
}
