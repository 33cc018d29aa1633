use pdclust::Auction;
use pdclust::Bipartite;
use pdclust::Config;
use pdclust::Coupling;
use pdclust::CriticalPair;
use pdclust::CriticalType;
use pdclust::GroundCost;
use pdclust::Hungarian;
use pdclust::Order;
use pdclust::Point;
use pdclust::Wasserstein;
use pdclust::execute;
use proptest::prelude::*;

fn points() -> impl Strategy<Value = Vec<Point>> {
    prop::collection::vec((0.0f64..10.0, 0.01f64..5.0), 0..12)
        .prop_map(|v| v.into_iter().map(|(b, p)| Point::new(b, b + p)).collect())
}

/// Points that also carry a domain position, so α < 1 has something to weigh.
fn placed() -> impl Strategy<Value = Vec<Point>> {
    prop::collection::vec((0.0f64..10.0, 0.01f64..5.0, prop::array::uniform3(-5.0f64..5.0)), 0..12)
        .prop_map(|v| {
            v.into_iter()
                .map(|(b, p, coords)| Point {
                    birth: b,
                    death: b + p,
                    coords,
                })
                .collect()
        })
}

fn orders() -> impl Strategy<Value = Order> {
    prop_oneof![Just(Order::W1), Just(Order::W2), Just(Order::Bottleneck)]
}

fn pairs() -> impl Strategy<Value = Vec<CriticalPair>> {
    prop::collection::vec((0.0f64..10.0, 0.01f64..5.0, 0usize..3), 1..8).prop_map(|v| {
        v.into_iter()
            .map(|(b, p, t)| {
                let (bt, dt) = [
                    (CriticalType::LocalMin, CriticalType::Saddle1),
                    (CriticalType::Saddle1, CriticalType::Saddle2),
                    (CriticalType::Saddle2, CriticalType::LocalMax),
                ][t];
                CriticalPair::from((bt, dt, b, b + p))
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_distance_to_self_is_zero(a in placed(), order in orders(), alpha in 0.0f64..=1.0) {
        let ref metric = GroundCost::new(order, alpha);
        prop_assert_eq!(Wasserstein::new(metric).distance(&a, &a), 0.);
    }

    #[test]
    fn prop_distance_is_symmetric(
        a in placed(),
        b in placed(),
        order in orders(),
        alpha in 0.0f64..=1.0
    ) {
        let ref metric = GroundCost::new(order, alpha);
        let matcher = Wasserstein::new(metric);
        let ab = matcher.distance(&a, &b);
        let ba = matcher.distance(&b, &a);
        prop_assert!((ab - ba).abs() <= 1e-6 * (1. + ab));
    }

    #[test]
    fn prop_triangle_inequality(
        a in placed(),
        b in placed(),
        c in placed(),
        order in orders(),
        alpha in 0.0f64..=1.0
    ) {
        let ref metric = GroundCost::new(order, alpha);
        let matcher = Wasserstein::new(metric);
        let ac = matcher.distance(&a, &c);
        let ab = matcher.distance(&a, &b);
        let bc = matcher.distance(&b, &c);
        prop_assert!(ac <= ab + bc + 1e-6 * (1. + ac));
    }

    #[test]
    fn prop_auction_matches_hungarian(
        a in placed(),
        b in placed(),
        w1 in any::<bool>(),
        alpha in 0.0f64..=1.0,
        indexed in any::<bool>()
    ) {
        let order = if w1 { Order::W1 } else { Order::W2 };
        let ref metric = GroundCost::new(order, alpha);
        let problem = Bipartite::from((metric, &a[..], &b[..]));
        let exact = Hungarian::from(problem).minimize().cost();
        let auction = Auction::from(problem).indexed(indexed).minimize();
        if !auction.degenerate() {
            let approx = auction.cost();
            prop_assert!(approx >= exact - 1e-6 * (1. + exact));
            prop_assert!(approx <= exact + 1e-6 * (1. + exact));
        }
    }

    #[test]
    fn prop_every_point_matched_once(a in points(), b in points(), order in orders()) {
        let ref metric = GroundCost::new(order, 1.);
        let transport = Wasserstein::new(metric).transport(&a, &b);
        let mut sources = transport.matchings.iter().filter_map(|m| m.source).collect::<Vec<_>>();
        let mut targets = transport.matchings.iter().filter_map(|m| m.target).collect::<Vec<_>>();
        sources.sort();
        targets.sort();
        prop_assert_eq!(sources, (0..a.len()).collect::<Vec<_>>());
        prop_assert_eq!(targets, (0..b.len()).collect::<Vec<_>>());
    }

    #[test]
    fn prop_clustering_labels_in_range(
        diagrams in prop::collection::vec(pairs(), 1..8),
        k in 1usize..4,
        accelerated in any::<bool>()
    ) {
        if k <= diagrams.len() {
            let config = Config::default()
                .with_clusters(k)
                .with_accelerated(accelerated)
                .with_threads(1);
            let report = execute(&diagrams, &config).unwrap();
            prop_assert_eq!(report.labels.len(), diagrams.len());
            prop_assert_eq!(report.sizes.iter().sum::<usize>(), diagrams.len());
            for &l in &report.labels {
                prop_assert!(l < k);
            }
        }
    }
}
