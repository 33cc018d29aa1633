criterion::criterion_main!(benches);
criterion::criterion_group! {
    name = benches;
    config = criterion::Criterion::default()
        .without_plots()
        .noise_threshold(3.0)
        .significance_level(0.01)
        .sample_size(10)
        .measurement_time(std::time::Duration::from_secs(1));
    targets =
        matching_auction_linear,
        matching_auction_kdtree,
        matching_hungarian,
        matching_bottleneck,
        clustering_kmeans_elkan,
        clustering_kmeans_naive,
        searching_nearest_progressive,
        searching_nearest_full,
}

fn diagram(n: usize) -> Vec<Point> {
    (0..n).map(|_| Point::random()).collect()
}

fn matching_auction_linear(c: &mut criterion::Criterion) {
    let ref metric = GroundCost::new(Order::W2, 1.);
    let (lhs, rhs) = (diagram(256), diagram(256));
    c.bench_function("match 256 points (auction, linear scan)", |b| {
        b.iter(|| {
            Auction::from(Bipartite::from((metric, &lhs[..], &rhs[..])))
                .indexed(false)
                .minimize()
                .cost()
        })
    });
}

fn matching_auction_kdtree(c: &mut criterion::Criterion) {
    let ref metric = GroundCost::new(Order::W2, 1.);
    let (lhs, rhs) = (diagram(256), diagram(256));
    c.bench_function("match 256 points (auction, kd-tree)", |b| {
        b.iter(|| {
            Auction::from(Bipartite::from((metric, &lhs[..], &rhs[..])))
                .indexed(true)
                .minimize()
                .cost()
        })
    });
}

fn matching_hungarian(c: &mut criterion::Criterion) {
    let ref metric = GroundCost::new(Order::W2, 1.);
    let (lhs, rhs) = (diagram(64), diagram(64));
    c.bench_function("match 64 points (hungarian)", |b| {
        b.iter(|| {
            Hungarian::from(Bipartite::from((metric, &lhs[..], &rhs[..])))
                .minimize()
                .cost()
        })
    });
}

fn matching_bottleneck(c: &mut criterion::Criterion) {
    let ref metric = GroundCost::new(Order::Bottleneck, 1.);
    let (lhs, rhs) = (diagram(64), diagram(64));
    c.bench_function("match 64 points (bottleneck)", |b| {
        b.iter(|| {
            Bottleneck::from(Bipartite::from((metric, &lhs[..], &rhs[..])))
                .minimize()
                .cost()
        })
    });
}

fn clustering_kmeans_elkan(c: &mut criterion::Criterion) {
    let fixture = Fixture::new(0, 4, 8, 24);
    let config = Config::default()
        .with_clusters(4)
        .with_accelerated(true)
        .with_matchings(false);
    c.bench_function("diagram k-means clustering (Elkan optimization)", |b| {
        b.iter(|| execute(&fixture.diagrams, &config))
    });
}

fn clustering_kmeans_naive(c: &mut criterion::Criterion) {
    let fixture = Fixture::new(0, 4, 8, 24);
    let config = Config::default()
        .with_clusters(4)
        .with_accelerated(false)
        .with_matchings(false);
    c.bench_function("diagram k-means clustering (naive implementation)", |b| {
        b.iter(|| execute(&fixture.diagrams, &config))
    });
}

fn searching_nearest_progressive(c: &mut criterion::Criterion) {
    searching_nearest(c, "nearest centroid search (progressive refinement)", true);
}

fn searching_nearest_full(c: &mut criterion::Criterion) {
    searching_nearest(c, "nearest centroid search (full resolution)", false);
}

fn searching_nearest(c: &mut criterion::Criterion, name: &str, progressive: bool) {
    let fixture = Fixture::new(1, 8, 2, 96);
    let ref metric = GroundCost::new(Order::W2, 1.);
    let (partitions, active) = Partition::all(&fixture.diagrams, Selector::All);
    let samples = partitions
        .iter()
        .map(|p| Sample::new(p, metric, 0.5))
        .collect::<Vec<_>>();
    let centroids = samples.iter().step_by(2).map(Centroid::from).collect::<Vec<_>>();
    let candidates = (0..centroids.len()).collect::<Vec<_>>();
    let peak = samples.iter().map(Sample::peak).fold(0., f64::max);
    let schedule = Schedule::new(peak, progressive);
    let space = Space::new(Wasserstein::new(metric), active);
    let refinement = Refinement::new(&space, &schedule);
    c.bench_function(name, |b| {
        b.iter(|| {
            samples
                .iter()
                .map(|sample| refinement.nearest(sample, &centroids, &candidates, None).j)
                .sum::<usize>()
        })
    });
}

use pdclust::Arbitrary;
use pdclust::Auction;
use pdclust::Bipartite;
use pdclust::Bottleneck;
use pdclust::Centroid;
use pdclust::Config;
use pdclust::Coupling;
use pdclust::Fixture;
use pdclust::GroundCost;
use pdclust::Hungarian;
use pdclust::Order;
use pdclust::Partition;
use pdclust::Point;
use pdclust::Refinement;
use pdclust::Sample;
use pdclust::Schedule;
use pdclust::Selector;
use pdclust::Space;
use pdclust::Wasserstein;
use pdclust::execute;
