use error_stack::Report;
use vidi_boundary::prelude::*;

fn four_rows() -> Dataset {
    Dataset::new()
        .with_column("a", [1.0, 2.0, 3.0, 4.0])
        .unwrap()
        .with_column("b", [1.0, 1.5, 3.5, 4.0])
        .unwrap()
        .with_column("c", ["A", "A", "B", "B"])
        .unwrap()
}

fn always_a(points: &[[f64; 2]]) -> std::result::Result<Vec<Value>, Report<PredictError>> {
    Ok(vec![Value::from("A"); points.len()])
}

fn broken(_points: &[[f64; 2]]) -> std::result::Result<Vec<Value>, Report<PredictError>> {
    Err(Report::new(PredictError).attach("model not fitted".to_string()))
}

#[test]
fn unknown_columns_are_reported_by_name() {
    let data = four_rows();
    for (f1, f2, target) in [("z", "b", "c"), ("a", "z", "c"), ("a", "b", "z")] {
        let err = plot(&data, f1, f2, target, None).unwrap_err();
        match err.current_context() {
            PlotError::ColumnNotFound(name) => assert_eq!(name, "z"),
            other => panic!("expected ColumnNotFound, got {other:?}"),
        }
    }
}

fn unit_square() -> Dataset {
    Dataset::new()
        .with_column("a", [0.0, 1.0, 0.0, 1.0])
        .unwrap()
        .with_column("b", [0.0, 0.0, 1.0, 1.0])
        .unwrap()
        .with_column("c", ["A", "A", "B", "B"])
        .unwrap()
}

#[test]
fn scatter_only_without_a_model() {
    for data in [unit_square(), four_rows()] {
        let fig = plot(&data, "a", "b", "c", None).unwrap();

        assert_eq!(fig.layers.len(), 1);
        assert_eq!(fig.contour_layers().count(), 0);
        let scatter = fig.scatter_layers().next().unwrap();
        assert_eq!(scatter.point_count(), 4);

        let groups = &scatter.groups;
        assert_eq!(groups.len(), 2);
        assert_eq!((groups[0].label.as_str(), groups[1].label.as_str()), ("A", "B"));
        assert_eq!((groups[0].points.len(), groups[1].points.len()), (2, 2));
        assert_ne!(groups[0].color, groups[1].color);
        assert_ne!(groups[0].marker, groups[1].marker);
    }
}

#[test]
fn malformed_contour_file_is_an_error() {
    let mut fig = plot(&unit_square(), "a", "b", "c", Some(&always_a)).unwrap();
    let Some(Layer::Contour(contour)) = fig.layers.get_mut(1) else {
        panic!("expected a contour layer on top");
    };
    contour.positions.truncate(2);
    let json = fig.to_json().unwrap();

    let err = Figure::from_json(&json).unwrap_err();
    assert!(matches!(err.current_context(), PlotError::Serialization));
}

#[test]
fn constant_model_fills_the_whole_grid() {
    let fig = plot(&four_rows(), "a", "b", "c", Some(&always_a)).unwrap();

    assert_eq!(fig.scatter_layers().count(), 1);
    assert_eq!(fig.scatter_layers().next().unwrap().point_count(), 4);

    let contours: Vec<_> = fig.contour_layers().collect();
    assert_eq!(contours.len(), 1);
    let contour = contours[0];
    assert_eq!(contour.values.len(), contour.cols() * contour.rows());
    assert!(contour.values.iter().all(|v| *v == Value::from("A")));
    assert_eq!(contour.levels, vec![Value::from("A")]);

    // scatter first, boundary drawn over it
    assert!(matches!(fig.layers[0], Layer::Scatter(_)));
    assert!(matches!(fig.layers[1], Layer::Contour(_)));
}

#[test]
fn grid_spans_the_data_plus_one_unit() {
    let fig = plot(&four_rows(), "a", "b", "c", Some(&always_a)).unwrap();
    let contour = fig.contour_layers().next().unwrap();

    // x in [0, 5), y in [0, 5) every 0.1
    assert_eq!((contour.cols(), contour.rows()), (50, 50));
    for p in &contour.positions {
        assert!(p.x >= -1e-6 && p.x < 5.0);
        assert!(p.y >= -1e-6 && p.y < 5.0);
    }
}

#[test]
fn classifier_failure_leaves_no_boundary() {
    let err = plot(&four_rows(), "a", "b", "c", Some(&broken)).unwrap_err();

    assert!(matches!(err.current_context(), PlotError::Prediction));
    assert!(err.downcast_ref::<PredictError>().is_some());
}

#[test]
fn boundary_beneath_puts_contour_first() {
    let plotter = Plotter::new(PlotConfig::default().layer_order(LayerOrder::BoundaryBeneath));
    let fig = plotter
        .plot(&four_rows(), "a", "b", "c", Some(&always_a))
        .unwrap();

    assert_eq!(fig.layers.len(), 2);
    assert!(matches!(fig.layers[0], Layer::Contour(_)));
    assert!(matches!(fig.layers[1], Layer::Scatter(_)));
}

#[test]
fn grid_builder_rejects_bad_steps() {
    for step in [0.0, -0.1, f64::NAN] {
        let err = build_grid(&[1.0, 2.0], &[1.0, 2.0], step).unwrap_err();
        assert!(matches!(err.current_context(), PlotError::InvalidInput(_)));
    }
}

#[test]
fn saved_figure_loads_back() {
    let fig = plot(&four_rows(), "a", "b", "c", Some(&always_a)).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("figure.json");

    fig.save_json(&path).unwrap();
    let json = std::fs::read_to_string(&path).unwrap();
    let loaded = Figure::from_json(&json).unwrap();

    assert_eq!(loaded.layers, fig.layers);
    assert_eq!(loaded.x_label.as_deref(), Some("a"));
    assert_eq!(loaded.legend_title.as_deref(), Some("c"));
}

#[test]
fn config_file_fills_missing_fields_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plot.json");
    std::fs::write(&path, r#"{ "grid_step": 0.5, "layer_order": "BoundaryBeneath" }"#).unwrap();

    let config = PlotConfig::load(&path).unwrap();
    assert_eq!(config.grid_step, 0.5);
    assert_eq!(config.layer_order, LayerOrder::BoundaryBeneath);
    assert_eq!(config.point_area, PlotConfig::default().point_area);

    let fig = Plotter::new(config)
        .plot(&four_rows(), "a", "b", "c", Some(&always_a))
        .unwrap();
    let contour = fig.contour_layers().next().unwrap();
    assert_eq!((contour.cols(), contour.rows()), (10, 10));
}
