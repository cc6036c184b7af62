use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use exohunt::archive::{LightCurveArchive, SearchEntry, SearchFilters};
use exohunt::exohunt_errors::ExohuntError;
use exohunt::lightcurve::{LightCurve, Segment};
use exohunt::missions::Mission;
use exohunt::target::TargetQuery;

/// Archive stub serving a fixed list of products, indexed by product ID.
pub struct MockArchive {
    pub products: Vec<Option<Segment>>,
}

impl MockArchive {
    pub fn new(products: Vec<Option<Segment>>) -> Self {
        MockArchive { products }
    }

    /// One search entry per product, in order.
    pub fn entries(&self) -> Vec<SearchEntry> {
        (0..self.products.len())
            .map(|i| SearchEntry {
                product_id: i.to_string(),
                target_name: "TIC 261136679".to_string(),
                mission: Some(Mission::Tess),
                author: "SPOC".to_string(),
                data_url: None,
                archive_url: None,
            })
            .collect()
    }
}

impl LightCurveArchive for MockArchive {
    fn search(
        &self,
        _query: &TargetQuery,
        _filters: &SearchFilters,
    ) -> Result<Vec<SearchEntry>, ExohuntError> {
        Ok(self.entries())
    }

    fn download(&self, entry: &SearchEntry) -> Result<Option<Segment>, ExohuntError> {
        let index: usize = entry
            .product_id
            .parse()
            .expect("mock product IDs are indices");
        Ok(self.products[index].clone())
    }
}

/// Parameters of an injected boxy transit train.
#[derive(Debug, Clone, Copy)]
pub struct InjectedTransit {
    pub period: f64,
    pub epoch: f64,
    pub depth: f64,
    pub duration: f64,
}

impl Default for InjectedTransit {
    fn default() -> Self {
        InjectedTransit {
            period: 2.5,
            epoch: 1.0,
            depth: 0.01,
            duration: 0.1,
        }
    }
}

/// Build one raw observation segment with a transit train on a drifting
/// baseline plus Gaussian noise, sprinkled with a few null samples.
pub fn synthetic_segment(
    t_start: f64,
    t_end: f64,
    cadence: f64,
    transit: InjectedTransit,
    seed: u64,
) -> Segment {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 20.0).expect("valid noise sigma");

    let baseline = 20_000.0; // raw electrons/s, far from 1.0 on purpose
    let trend = 150.0; // slow drift per day

    let mut time = Vec::new();
    let mut flux = Vec::new();
    let mut t = t_start;
    let mut i = 0usize;
    while t < t_end {
        let phase = (t - transit.epoch + transit.period / 2.0).rem_euclid(transit.period)
            - transit.period / 2.0;
        let in_transit = phase.abs() < transit.duration / 2.0;

        let mut f = baseline + trend * (t - t_start) + noise.sample(&mut rng);
        if in_transit {
            f *= 1.0 - transit.depth;
        }
        // Every 97th cadence drops out, as real photometry does.
        if i % 97 == 0 {
            f = f64::NAN;
        }

        time.push(t);
        flux.push(f);
        t += cadence;
        i += 1;
    }

    Segment {
        curve: LightCurve::without_errors(time, flux).expect("parallel arrays"),
        mission: Some(Mission::Tess),
        author: "SPOC".to_string(),
    }
}

/// A segment whose every sample is null.
pub fn all_null_segment(t_start: f64, n: usize) -> Segment {
    let time: Vec<f64> = (0..n).map(|i| t_start + i as f64 * 0.01).collect();
    let flux = vec![f64::NAN; n];
    Segment {
        curve: LightCurve::without_errors(time, flux).expect("parallel arrays"),
        mission: Some(Mission::Tess),
        author: "QLP".to_string(),
    }
}
