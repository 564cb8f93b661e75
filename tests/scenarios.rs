use grid_search::{
    Algorithm, ChannelSink, GridEnvironment, Neighborhood, NullSink, Outcome, Position,
    SearchController, SearchResult, SearchSettings, StepEvent, StepSink,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn open_grid(rows: usize, cols: usize, start: Position, target: Position) -> GridEnvironment {
    let mut env = GridEnvironment::new(rows, cols).unwrap();
    env.set_start(start).unwrap();
    env.set_target(target).unwrap();
    env
}

fn controller(settings: SearchSettings) -> SearchController {
    SearchController::new(settings.without_dynamic_obstacles()).unwrap()
}

fn run(controller: &SearchController, env: &GridEnvironment, algorithm: Algorithm) -> SearchResult {
    let mut grid = env.clone();
    controller.run(&mut grid, algorithm, &mut NullSink)
}

#[test]
fn breadth_first_and_bidirectional_walk_chebyshev_distance_on_open_grids() {
    let controller = controller(SearchSettings::default());
    let pairs = [
        (Position::new(0, 0), Position::new(3, 4)),
        (Position::new(0, 0), Position::new(9, 9)),
        (Position::new(9, 0), Position::new(0, 6)),
        (Position::new(4, 4), Position::new(4, 8)),
        (Position::new(7, 2), Position::new(1, 3)),
    ];

    for (start, target) in pairs {
        let env = open_grid(10, 10, start, target);
        for algorithm in [Algorithm::Bfs, Algorithm::Bidirectional] {
            let result = run(&controller, &env, algorithm);
            let path = result.path().unwrap();
            assert_eq!(
                path.edge_count(),
                start.chebyshev_distance(&target),
                "{} from {} to {}",
                algorithm,
                start,
                target
            );
            assert_eq!(path.start(), Some(start));
            assert_eq!(path.target(), Some(target));
        }
    }
}

#[test]
fn three_by_four_offset_takes_four_moves() {
    let controller = controller(SearchSettings::default());
    let env = open_grid(10, 10, Position::new(0, 0), Position::new(3, 4));
    let result = run(&controller, &env, Algorithm::Bfs);
    let path = result.path().unwrap();
    assert_eq!(path.edge_count(), 4);
    assert_eq!(path.len(), 5);
}

#[test]
fn uniform_cost_is_cheapest_and_reachability_agrees() {
    let controller = controller(
        SearchSettings::default()
            .with_depth_limit(225)
            .with_max_depth(225),
    );

    for seed in 0..10 {
        let mut rng = StdRng::seed_from_u64(seed);
        let env = GridEnvironment::random(15, 15, 40, &mut rng).unwrap();
        let ucs = run(&controller, &env, Algorithm::Ucs);

        for algorithm in Algorithm::ALL {
            let result = run(&controller, &env, algorithm);
            assert_eq!(
                result.is_found(),
                ucs.is_found(),
                "{} disagrees with UCS on seed {}",
                algorithm,
                seed
            );
            if let (Some(cheapest), Some(path)) = (ucs.path(), result.path()) {
                assert!(
                    cheapest.cost() <= path.cost() + 1e-9,
                    "{} found a cheaper path than UCS on seed {}",
                    algorithm,
                    seed
                );
            }
        }
    }
}

#[test]
fn diagonal_between_two_obstacles_is_never_offered() {
    let mut env = open_grid(3, 3, Position::new(0, 0), Position::new(1, 1));
    env.add_obstacle(Position::new(0, 1)).unwrap();
    env.add_obstacle(Position::new(1, 0)).unwrap();

    assert!(!env.get_neighbors(Position::new(0, 0)).contains(&Position::new(1, 1)));

    let controller = controller(SearchSettings::default());
    for algorithm in Algorithm::ALL {
        let result = run(&controller, &env, algorithm);
        assert_eq!(result.outcome, Outcome::NotFound, "{}", algorithm);
    }
}

#[test]
fn iterative_deepening_matches_breadth_first_reachability() {
    let controller = controller(SearchSettings::default().with_max_depth(100));
    let mut env = open_grid(8, 8, Position::new(0, 0), Position::new(7, 7));
    for row in 0..7 {
        env.add_obstacle(Position::new(row, 3)).unwrap();
    }

    let breadth = run(&controller, &env, Algorithm::Bfs);
    let deepening = run(&controller, &env, Algorithm::Iddfs);
    assert_eq!(
        breadth.path().map(|p| p.edge_count()),
        deepening.path().map(|p| p.edge_count())
    );

    env.add_obstacle(Position::new(7, 3)).unwrap();
    let breadth = run(&controller, &env, Algorithm::Bfs);
    let deepening = run(&controller, &env, Algorithm::Iddfs);
    assert_eq!(breadth.outcome, Outcome::NotFound);
    assert_eq!(deepening.outcome, Outcome::NotFound);
}

#[test]
fn every_deepening_pass_starts_from_scratch() {
    #[derive(Default)]
    struct PassRecorder {
        passes: Vec<usize>,
        first_explored_per_pass: Vec<usize>,
        awaiting_first_step: bool,
    }

    impl StepSink for PassRecorder {
        fn on_step(&mut self, event: &StepEvent<'_>) {
            if self.awaiting_first_step {
                self.first_explored_per_pass.push(event.explored.len());
                self.awaiting_first_step = false;
            }
            assert!(event.explored.len() <= event.expansion);
        }

        fn on_pass_start(&mut self, depth_limit: usize) {
            self.passes.push(depth_limit);
            self.awaiting_first_step = true;
        }
    }

    let controller = controller(SearchSettings::default());
    let mut env = open_grid(10, 10, Position::new(0, 0), Position::new(9, 9));
    let mut recorder = PassRecorder::default();
    let result = controller.run(&mut env, Algorithm::Iddfs, &mut recorder);

    assert_eq!(result.path().unwrap().edge_count(), 9);
    assert_eq!(recorder.passes, (0..=9).collect::<Vec<_>>());
    assert!(recorder.first_explored_per_pass.iter().all(|&n| n == 1));
}

#[test]
fn set_start_on_an_obstacle_is_idempotent() {
    let mut env = GridEnvironment::new(5, 5).unwrap();
    let cell = Position::new(2, 3);
    env.add_obstacle(cell).unwrap();
    env.add_obstacle(Position::new(0, 0)).unwrap();

    env.set_start(cell).unwrap();
    assert!(!env.is_obstacle(cell));
    let after_first: Vec<Position> = env.obstacles().collect();

    env.set_start(cell).unwrap();
    let after_second: Vec<Position> = env.obstacles().collect();
    assert_eq!(after_first, after_second);
    assert_eq!(env.obstacle_count(), 1);
}

#[test]
fn depth_limited_search_respects_its_bound() {
    let env = open_grid(10, 10, Position::new(0, 0), Position::new(9, 9));

    let shallow = run(&controller(SearchSettings::default().with_depth_limit(5)), &env, Algorithm::Dls);
    assert_eq!(shallow.outcome, Outcome::NotFound);

    let exact = run(&controller(SearchSettings::default().with_depth_limit(9)), &env, Algorithm::Dls);
    assert_eq!(exact.path().unwrap().edge_count(), 9);
}

#[test]
fn identical_endpoints_return_the_single_cell() {
    let controller = controller(SearchSettings::default());
    let env = open_grid(5, 5, Position::new(2, 2), Position::new(2, 2));

    for algorithm in Algorithm::ALL {
        let result = run(&controller, &env, algorithm);
        assert_eq!(result.path().unwrap().cells(), &[Position::new(2, 2)], "{}", algorithm);
        assert_eq!(result.nodes_explored, 1, "{}", algorithm);
    }
}

#[test]
fn cancellation_after_three_expansions_stops_at_three() {
    let controller = controller(SearchSettings::default());
    let token = controller.cancellation_token();
    let env = open_grid(100, 100, Position::new(0, 0), Position::new(99, 99));

    for algorithm in Algorithm::ALL {
        let mut grid = env.clone();
        let mut sink = |event: &StepEvent<'_>| {
            if event.expansion == 3 {
                token.cancel();
            }
        };
        let result = controller.run(&mut grid, algorithm, &mut sink);
        assert_eq!(result.outcome, Outcome::Cancelled, "{}", algorithm);
        assert_eq!(result.nodes_explored, 3, "{}", algorithm);
        assert!(result.path().is_none());
    }
}

#[test]
fn cancellation_from_another_thread_reaches_a_terminal_state() {
    let controller = controller(SearchSettings::default());
    let token = controller.cancellation_token();
    let mut env = open_grid(300, 300, Position::new(0, 0), Position::new(299, 299));
    let (mut sink, receiver) = ChannelSink::bounded(1);

    let watcher = std::thread::spawn(move || {
        if receiver.recv().is_ok() {
            token.cancel();
        }
    });
    let result = controller.run(&mut env, Algorithm::Dfs, &mut sink);
    watcher.join().unwrap();

    assert!(matches!(result.outcome, Outcome::Cancelled | Outcome::Found(_)));
}

#[test]
fn channel_sink_streams_every_expansion_in_order() {
    let controller = controller(SearchSettings::default());
    let target = Position::new(5, 5);
    let mut env = open_grid(6, 6, Position::new(0, 0), target);
    let (mut sink, receiver) = ChannelSink::bounded(1024);

    let result = controller.run(&mut env, Algorithm::Bfs, &mut sink);
    let snapshots: Vec<_> = receiver.try_iter().collect();

    assert_eq!(sink.dropped(), 0);
    assert_eq!(snapshots.len(), result.nodes_explored);
    assert!(snapshots
        .iter()
        .enumerate()
        .all(|(i, snapshot)| snapshot.expansion == i + 1));
    assert_eq!(snapshots.last().map(|s| s.cell), Some(target));
}

#[test]
fn dynamic_obstacles_stay_until_cleared() {
    let settings = SearchSettings::default().with_seed(3);
    let controller = SearchController::new(
        settings.with_obstacle_policy(
            grid_search::ObstaclePolicy::new(0.5, grid_search::SpawnExclusion::EndpointsOnly)
                .unwrap(),
        ),
    )
    .unwrap();
    let mut env = open_grid(12, 12, Position::new(0, 0), Position::new(11, 11));

    let result = controller.run(&mut env, Algorithm::Bfs, &mut NullSink);
    assert!(!result.dynamic_obstacles.is_empty());
    for &cell in &result.dynamic_obstacles {
        assert!(env.is_obstacle(cell));
        assert!(!env.is_endpoint(cell));
    }

    env.clear_dynamic_obstacles();
    assert_eq!(env.obstacle_count(), 0);
    assert_eq!(env.dynamic_obstacles().count(), 0);
}

#[test]
fn six_way_neighborhood_only_moves_along_one_diagonal() {
    let controller = controller(SearchSettings::default());

    let env = open_grid(10, 10, Position::new(0, 0), Position::new(3, 3))
        .with_neighborhood(Neighborhood::Six);
    assert_eq!(run(&controller, &env, Algorithm::Bfs).path().unwrap().edge_count(), 6);
    assert_eq!(
        run(&controller, &env, Algorithm::Bidirectional)
            .path()
            .unwrap()
            .edge_count(),
        6
    );

    let env = open_grid(10, 10, Position::new(3, 0), Position::new(0, 3))
        .with_neighborhood(Neighborhood::Six);
    assert_eq!(run(&controller, &env, Algorithm::Bfs).path().unwrap().edge_count(), 3);
}
