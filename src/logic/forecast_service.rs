use crate::error::{IrrigOpsError, Result};
use crate::models::{ForecastOrigin, ForecastSeries};
use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use std::collections::HashMap;
use std::future::Future;

/// Where and how far ahead to forecast
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    pub horizon_days: u32,
}

impl ForecastRequest {
    pub fn cache_key(&self) -> String {
        format!(
            "{:.4},{:.4},{},{}",
            self.latitude, self.longitude, self.timezone, self.horizon_days
        )
    }
}

/// A source of daily forecasts.
pub trait ForecastProvider {
    fn fetch_daily(&self, request: &ForecastRequest) -> impl Future<Output = Result<ForecastSeries>>;
}

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Calendar date the weekly plan is anchored to.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A live series must cover the requested horizon one calendar day at a time.
fn check_series(series: ForecastSeries, request: &ForecastRequest) -> Result<ForecastSeries> {
    if series.is_empty() {
        return Err(IrrigOpsError::InvalidData("forecast has no days".into()));
    }
    if series.len() != request.horizon_days as usize {
        return Err(IrrigOpsError::InvalidData(format!(
            "forecast has {} days, expected {}",
            series.len(),
            request.horizon_days
        )));
    }
    if let Some(pair) = series
        .days
        .windows(2)
        .find(|pair| pair[1].date - pair[0].date != Duration::days(1))
    {
        return Err(IrrigOpsError::InvalidData(format!(
            "forecast dates are not consecutive: {} then {}",
            pair[0].date, pair[1].date
        )));
    }
    Ok(series)
}

/// Live forecasts remembered for a fixed time-to-live
#[derive(Debug)]
pub struct ForecastCache {
    ttl: Duration,
    entries: HashMap<String, (DateTime<Utc>, ForecastSeries)>,
}

impl ForecastCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Entry for `key` if it was stored less than one TTL before `now`.
    pub fn get(&self, key: &str, now: DateTime<Utc>) -> Option<&ForecastSeries> {
        self.entries
            .get(key)
            .filter(|(stored_at, _)| now - *stored_at < self.ttl)
            .map(|(_, series)| series)
    }

    pub fn put(&mut self, key: String, series: ForecastSeries, now: DateTime<Utc>) {
        self.entries.insert(key, (now, series));
    }

    pub fn invalidate(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Result of one acquisition. `degraded` carries the failure reason when the
/// demo series stands in for live data.
#[derive(Debug, Clone)]
pub struct Acquired {
    pub series: ForecastSeries,
    pub degraded: Option<String>,
}

impl Acquired {
    pub fn is_live(&self) -> bool {
        self.series.origin == ForecastOrigin::Live
    }
}

pub struct ForecastService<P, C = SystemClock> {
    provider: P,
    clock: C,
    cache: ForecastCache,
}

impl<P: ForecastProvider> ForecastService<P, SystemClock> {
    pub fn new(provider: P, ttl: Duration) -> Self {
        Self::with_clock(provider, SystemClock, ttl)
    }
}

impl<P: ForecastProvider, C: Clock> ForecastService<P, C> {
    pub fn with_clock(provider: P, clock: C, ttl: Duration) -> Self {
        Self {
            provider,
            clock,
            cache: ForecastCache::new(ttl),
        }
    }

    /// Cached or live forecast; falls back to the demo week on any failure.
    pub async fn fetch(&mut self, request: &ForecastRequest) -> Acquired {
        let key = request.cache_key();
        let now = self.clock.now();

        if let Some(series) = self.cache.get(&key, now) {
            tracing::debug!("Forecast cache hit for {}", key);
            return Acquired {
                series: series.clone(),
                degraded: None,
            };
        }

        let fetched = self
            .provider
            .fetch_daily(request)
            .await
            .and_then(|series| check_series(series, request));

        match fetched {
            Ok(series) => {
                tracing::info!(
                    "Fetched {}-day forecast for {}",
                    series.len(),
                    key
                );
                self.cache.put(key, series.clone(), now);
                Acquired {
                    series,
                    degraded: None,
                }
            }
            Err(e) => {
                tracing::warn!("Forecast unavailable, using demo data: {}", e);
                Acquired {
                    series: ForecastSeries::demo(self.clock.today(), now),
                    degraded: Some(e.to_string()),
                }
            }
        }
    }

    /// Drop the cached entry so the next fetch goes to the provider.
    pub fn invalidate(&mut self, request: &ForecastRequest) {
        self.cache.invalidate(&request.cache_key());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DailyObservation;
    use chrono::NaiveDate;
    use std::cell::Cell;
    use std::rc::Rc;

    struct FakeProvider {
        calls: Cell<usize>,
        fail: Cell<bool>,
        dates: Option<Vec<NaiveDate>>,
    }

    impl FakeProvider {
        fn ok() -> Self {
            Self {
                calls: Cell::new(0),
                fail: Cell::new(false),
                dates: None,
            }
        }

        fn failing() -> Self {
            Self {
                fail: Cell::new(true),
                ..Self::ok()
            }
        }
    }

    impl ForecastProvider for FakeProvider {
        async fn fetch_daily(&self, request: &ForecastRequest) -> Result<ForecastSeries> {
            self.calls.set(self.calls.get() + 1);
            if self.fail.get() {
                return Err(IrrigOpsError::DataSourceUnavailable("connection refused".into()));
            }
            let start = NaiveDate::from_ymd_opt(2025, 11, 17).unwrap();
            let dates = self.dates.clone().unwrap_or_else(|| {
                (0..request.horizon_days as i64)
                    .map(|i| start + Duration::days(i))
                    .collect()
            });
            let days = dates
                .into_iter()
                .map(|date| DailyObservation {
                    date,
                    temp_max_c: Some(27.0),
                    rainfall_mm: 1.0,
                    et0_mm: 4.0,
                })
                .collect();
            Ok(ForecastSeries::new(ForecastOrigin::Live, fixed_now(), days))
        }
    }

    #[derive(Clone)]
    struct FakeClock(Rc<Cell<DateTime<Utc>>>);

    impl FakeClock {
        fn advance(&self, by: Duration) {
            self.0.set(self.0.get() + by);
        }
    }

    impl Clock for FakeClock {
        fn now(&self) -> DateTime<Utc> {
            self.0.get()
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-11-17T06:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn request() -> ForecastRequest {
        ForecastRequest {
            latitude: -1.5789,
            longitude: 30.5089,
            timezone: "Africa/Kigali".into(),
            horizon_days: 7,
        }
    }

    fn service(provider: FakeProvider) -> (ForecastService<FakeProvider, FakeClock>, FakeClock) {
        let clock = FakeClock(Rc::new(Cell::new(fixed_now())));
        let svc = ForecastService::with_clock(provider, clock.clone(), Duration::seconds(3600));
        (svc, clock)
    }

    #[tokio::test]
    async fn live_forecast_is_cached_within_ttl() {
        let (mut svc, clock) = service(FakeProvider::ok());

        let first = svc.fetch(&request()).await;
        assert!(first.is_live());
        assert!(first.degraded.is_none());
        assert_eq!(first.series.len(), 7);

        clock.advance(Duration::minutes(30));
        let second = svc.fetch(&request()).await;
        assert_eq!(second.series, first.series);
        assert_eq!(svc.provider.calls.get(), 1);
    }

    #[tokio::test]
    async fn expired_entry_is_refetched() {
        let (mut svc, clock) = service(FakeProvider::ok());

        svc.fetch(&request()).await;
        clock.advance(Duration::seconds(3600));
        svc.fetch(&request()).await;

        assert_eq!(svc.provider.calls.get(), 2);
    }

    #[tokio::test]
    async fn different_horizon_is_a_different_entry() {
        let (mut svc, _clock) = service(FakeProvider::ok());

        svc.fetch(&request()).await;
        let longer = ForecastRequest {
            horizon_days: 10,
            ..request()
        };
        let acquired = svc.fetch(&longer).await;

        assert_eq!(acquired.series.len(), 10);
        assert_eq!(svc.provider.calls.get(), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let (mut svc, _clock) = service(FakeProvider::ok());

        svc.fetch(&request()).await;
        svc.invalidate(&request());
        svc.fetch(&request()).await;

        assert_eq!(svc.provider.calls.get(), 2);
    }

    #[tokio::test]
    async fn failure_falls_back_to_demo() {
        let (mut svc, _clock) = service(FakeProvider::failing());

        let acquired = svc.fetch(&request()).await;

        assert!(!acquired.is_live());
        assert_eq!(acquired.series.origin, ForecastOrigin::Demo);
        assert_eq!(acquired.series.len(), 7);
        assert_eq!(
            acquired.series.first_date(),
            NaiveDate::from_ymd_opt(2025, 11, 17)
        );
        assert!(acquired
            .degraded
            .as_deref()
            .is_some_and(|r| r.contains("connection refused")));
    }

    #[tokio::test]
    async fn demo_fallback_is_not_cached() {
        let (mut svc, _clock) = service(FakeProvider::failing());

        svc.fetch(&request()).await;
        svc.provider.fail.set(false);
        let acquired = svc.fetch(&request()).await;

        assert!(acquired.is_live());
        assert_eq!(svc.provider.calls.get(), 2);
    }

    #[tokio::test]
    async fn empty_response_is_a_failure() {
        let provider = FakeProvider {
            dates: Some(Vec::new()),
            ..FakeProvider::ok()
        };
        let (mut svc, _clock) = service(provider);

        let acquired = svc.fetch(&request()).await;
        assert_eq!(acquired.series.origin, ForecastOrigin::Demo);
        assert!(acquired.degraded.is_some());
    }

    #[tokio::test]
    async fn short_series_is_a_failure() {
        let d = |day| NaiveDate::from_ymd_opt(2025, 11, day).unwrap();
        let provider = FakeProvider {
            dates: Some(vec![d(17), d(18), d(19)]),
            ..FakeProvider::ok()
        };
        let (mut svc, _clock) = service(provider);

        let acquired = svc.fetch(&request()).await;
        assert!(!acquired.is_live());
        assert_eq!(acquired.series.len(), 7);
        assert!(acquired
            .degraded
            .as_deref()
            .is_some_and(|r| r.contains("3 days, expected 7")));

        svc.fetch(&request()).await;
        assert_eq!(svc.provider.calls.get(), 2);
    }

    #[tokio::test]
    async fn repeated_or_gapped_dates_are_a_failure() {
        let d = |day| NaiveDate::from_ymd_opt(2025, 11, day).unwrap();
        for dates in [
            vec![d(17), d(17), d(18), d(19), d(20), d(21), d(22)],
            vec![d(17), d(18), d(19), d(21), d(22), d(23), d(24)],
        ] {
            let provider = FakeProvider {
                dates: Some(dates),
                ..FakeProvider::ok()
            };
            let (mut svc, _clock) = service(provider);

            let acquired = svc.fetch(&request()).await;
            assert_eq!(acquired.series.origin, ForecastOrigin::Demo);
            assert!(acquired
                .degraded
                .as_deref()
                .is_some_and(|r| r.contains("not consecutive")));
        }
    }

    struct LocalDayClock {
        now: DateTime<Utc>,
        today: NaiveDate,
    }

    impl Clock for LocalDayClock {
        fn now(&self) -> DateTime<Utc> {
            self.now
        }

        fn today(&self) -> NaiveDate {
            self.today
        }
    }

    #[tokio::test]
    async fn demo_week_starts_on_local_day() {
        // 23:30 UTC is already the next day in Kigali
        let clock = LocalDayClock {
            now: DateTime::parse_from_rfc3339("2025-11-16T23:30:00Z")
                .unwrap()
                .with_timezone(&Utc),
            today: NaiveDate::from_ymd_opt(2025, 11, 17).unwrap(),
        };
        let mut svc = ForecastService::with_clock(FakeProvider::failing(), clock, Duration::seconds(3600));

        let acquired = svc.fetch(&request()).await;
        assert_eq!(acquired.series.first_date(), NaiveDate::from_ymd_opt(2025, 11, 17));
    }

    #[test]
    fn cache_honours_ttl() {
        let mut cache = ForecastCache::new(Duration::seconds(60));
        let series = ForecastSeries::demo(NaiveDate::from_ymd_opt(2025, 11, 17).unwrap(), fixed_now());
        cache.put("k".into(), series, fixed_now());

        assert!(cache.get("k", fixed_now() + Duration::seconds(59)).is_some());
        assert!(cache.get("k", fixed_now() + Duration::seconds(60)).is_none());
        assert!(cache.get("other", fixed_now()).is_none());

        cache.invalidate("k");
        assert!(cache.get("k", fixed_now()).is_none());
    }
}
