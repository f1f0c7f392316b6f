//! Full memetic runs on small generated graphs.

use std::io::Write;

use u_cnp::graph::{read, ProblemData};
use u_cnp::memetic::{MemeticSearch, MemeticSearchParams, ReduceParams, VariablePopulationParams};
use u_cnp::stop::{Combined, MaxIterations, MaxRuntime, NoImprovement, StoppingCriterion, TargetValue};
use u_cnp::{CnpError, Model};

/// `k` stars of `leaves` leaves each, centres joined in a path.
fn stars(k: usize, leaves: usize) -> ProblemData {
    let mut data = ProblemData::new();
    let stride = leaves + 1;
    for s in 0..k {
        let centre = s * stride;
        for l in 1..=leaves {
            data.add_edge(centre, centre + l);
        }
        if s > 0 {
            data.add_edge(centre - stride, centre);
        }
    }
    data
}

fn run(data: &ProblemData, params: MemeticSearchParams, seed: u64, stop: &mut dyn StoppingCriterion) -> u_cnp::MemeticResult {
    MemeticSearch::builder(data)
        .problem_type(if params.search == "BCLS" { "DCNP" } else { "CNP" })
        .budget(4)
        .hop_distance(2)
        .seed(seed)
        .params(params)
        .variable_params(VariablePopulationParams::default().with_max_idle_gens(3).with_max_pop_size(8))
        .build()
        .unwrap()
        .run(stop, true, false)
        .unwrap()
}

// ---- reproducibility ----

#[test]
fn same_seed_same_result_for_every_crossover() {
    let data = stars(4, 5);
    let configs = [
        MemeticSearchParams::default(),
        MemeticSearchParams::default()
            .with_search("cbns")
            .with_problem_reduction(false)
            .with_crossover("DBX"),
        MemeticSearchParams::default()
            .with_search("BCLS")
            .with_problem_reduction(false)
            .with_crossover("IRR")
            .with_pop_variable(false)
            .with_initial_pop_size(3)
            .with_reduce_params(ReduceParams::default().with_search("BCLS")),
        MemeticSearchParams::default()
            .with_search("BCLS")
            .with_reduce_params(ReduceParams::default().with_search("BCLS").with_beta(0.5)),
    ];
    for params in configs {
        let a = run(&data, params.clone(), 17, &mut MaxIterations::new(12).unwrap());
        let b = run(&data, params.clone(), 17, &mut MaxIterations::new(12).unwrap());
        assert_eq!(a.best_obj_value, b.best_obj_value, "{params:?}");
        assert_eq!(a.num_iterations, b.num_iterations);
        assert_eq!(a.best_solution, b.best_solution);
        let sizes = |r: &u_cnp::MemeticResult| -> Vec<usize> {
            r.stats.as_ref().unwrap().entries().iter().map(|e| e.population_size).collect()
        };
        assert_eq!(sizes(&a), sizes(&b));
    }
}

// ---- feasibility and quality ----

#[test]
fn star_centres_are_found() {
    let data = stars(4, 5);
    let result = run(&data, MemeticSearchParams::default(), 3, &mut TargetValue::new(0.0));
    assert_eq!(result.best_obj_value, 0.0);
    let centres: Vec<usize> = (0..4).map(|s| s * 6).collect();
    assert_eq!(result.best_solution.iter().copied().collect::<Vec<_>>(), centres);
    assert!(result.best_found_at_time <= result.runtime);
}

#[test]
fn population_grows_but_stays_capped() {
    let data = stars(5, 4);
    let mut stop = Combined::new(vec![
        Box::new(MaxIterations::new(40).unwrap()),
        Box::new(MaxRuntime::new(30.0).unwrap()),
    ])
    .unwrap();
    let result = run(&data, MemeticSearchParams::default().with_search("DLAS"), 9, &mut stop);
    let stats = result.stats.unwrap();
    let sizes: Vec<usize> = stats.entries().iter().map(|e| e.population_size).collect();
    assert!(sizes.windows(2).all(|w| w[0] <= w[1]));
    assert!(sizes.iter().all(|&s| s <= 8));
    assert_eq!(stats.num_iterations(), result.num_iterations);
}

#[test]
fn no_improvement_ends_run() {
    let data = stars(3, 3);
    let mut stop = NoImprovement::new(5).unwrap();
    let result = run(&data, MemeticSearchParams::default(), 0, &mut stop);
    assert!(result.num_iterations >= 5);
    let stats = result.stats.unwrap();
    assert_eq!(stats.entries().last().unwrap().num_idle_generations, 5);
}

// ---- errors ----

#[test]
fn configuration_errors_surface_at_build() {
    let data = stars(2, 3);
    let cases = [
        ("CNP", MemeticSearchParams::default().with_search("BCLS")),
        ("DCNP", MemeticSearchParams::default()),
        (
            "CNP",
            MemeticSearchParams::default()
                .with_problem_reduction(false)
                .with_crossover("IRR"),
        ),
        (
            "DCNP",
            MemeticSearchParams::default()
                .with_search("BCLS")
                .with_problem_reduction(false)
                .with_crossover("IRR")
                .with_pop_variable(false),
        ),
        ("TSP", MemeticSearchParams::default()),
    ];
    for (problem_type, params) in cases {
        let err = MemeticSearch::builder(&data)
            .problem_type(problem_type)
            .budget(1)
            .params(params)
            .build()
            .unwrap_err();
        assert!(err.is_configuration(), "{problem_type}: {err}");
    }
}

#[test]
fn graph_file_round_trip_through_model() {
    let path = std::env::temp_dir().join(format!("u_cnp_e2e_{}.txt", std::process::id()));
    {
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "c two triangles and a bridge").unwrap();
        writeln!(file, "p edge 6 7").unwrap();
        for (u, v) in [(0, 1), (1, 2), (0, 2), (2, 3), (3, 4), (4, 5), (3, 5)] {
            writeln!(file, "e {u} {v}").unwrap();
        }
    }
    let data = read(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(data.num_nodes(), 6);
    assert_eq!(data.num_edges(), 7);

    let model = Model::from_data(data);
    let result = model.solve("cnp", 1, &mut MaxIterations::new(3).unwrap(), 5).unwrap();
    // removing either bridge endpoint leaves a triangle and an edge
    assert_eq!(result.best_obj_value, 4.0);
}

#[test]
fn missing_file_keeps_path() {
    let err = read("/definitely/not/here.graph").unwrap_err();
    assert!(matches!(err, CnpError::Io { .. }));
    assert!(err.to_string().contains("not/here.graph"));
}
