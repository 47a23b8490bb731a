use powerdash::api::{AgentReply, ChartBlock, ChatPresenter, DashConfig};
use powerdash::chart::FailureKind;
use powerdash::render::Emphasis;
use serde_json::json;

fn presenter() -> ChatPresenter {
    ChatPresenter::from_config(&DashConfig::default()).expect("default config")
}

#[test]
fn reply_without_chart_is_text_only() {
    let reply = AgentReply::from_json_str(
        r#"{"text_content": "Prices peak at 19:00.", "chart_data": null, "session_id": "s-1"}"#,
    )
    .expect("valid reply");
    let turn = presenter().present_reply(reply);

    assert_eq!(turn.text, "Prices peak at 19:00.");
    assert_eq!(turn.session_id.as_deref(), Some("s-1"));
    assert!(turn.chart.is_none());
    assert!(turn.canonical_chart().is_none());
}

#[test]
fn error_reply_missing_fields_still_parses() {
    let reply = AgentReply::from_json_str(r#"{"text_content": "Error: upstream timeout"}"#)
        .expect("partial reply");
    let turn = presenter().present_reply(reply);
    assert!(turn.chart.is_none());
    assert!(turn.session_id.is_none());
}

#[test]
fn string_chart_is_rendered_with_palette() {
    let chart_text = json!({
        "type": "line",
        "data": {
            "labels": ["08:00", "09:00"],
            "datasets": [
                { "label": "Price", "data": [61.0, 64.5] },
                { "label": "Forecast", "data": [60.0, 66.0] }
            ]
        }
    })
    .to_string();
    let reply = AgentReply {
        text_content: "Here is the chart.".to_owned(),
        chart_data: Some(json!(chart_text)),
        session_id: None,
    };

    let turn = presenter().present_reply(reply);
    let Some(ChartBlock::Rendered(spec)) = &turn.chart else {
        panic!("expected rendered chart, got {:?}", turn.chart);
    };
    assert_eq!(spec.series.len(), 2);
    assert_eq!(
        spec.series_named("Price").expect("price").color.to_hex(),
        "#2563eb"
    );
    assert!(turn.canonical_chart().is_some());
}

#[test]
fn malformed_chart_becomes_diagnostic_and_keeps_text() {
    let reply = AgentReply {
        text_content: "Chart attached.".to_owned(),
        chart_data: Some(json!({ "values": 3 })),
        session_id: Some("s-2".to_owned()),
    };
    let turn = presenter().present_reply(reply);

    assert_eq!(turn.text, "Chart attached.");
    let Some(ChartBlock::Diagnostic(diagnostic)) = &turn.chart else {
        panic!("expected diagnostic, got {:?}", turn.chart);
    };
    assert_eq!(diagnostic.kind, FailureKind::StructureMismatch);
    assert!(diagnostic.raw.contains("\"values\": 3"));
}

#[test]
fn unparseable_chart_text_is_diagnosed() {
    let reply = AgentReply {
        text_content: String::new(),
        chart_data: Some(json!("chart: [1, 2")),
        session_id: None,
    };
    let turn = presenter().present_reply(reply);
    let Some(ChartBlock::Diagnostic(diagnostic)) = &turn.chart else {
        panic!("expected diagnostic, got {:?}", turn.chart);
    };
    assert_eq!(diagnostic.kind, FailureKind::Unparseable);
    assert_eq!(diagnostic.raw, "chart: [1, 2");
}

#[test]
fn clicking_series_toggles_focus() {
    let presenter = presenter();
    let reply = AgentReply {
        text_content: String::new(),
        chart_data: Some(json!({
            "x": ["a", "b"],
            "y": { "Price": [1.0, 2.0], "Forecast": [1.5, 2.5] }
        })),
        session_id: None,
    };
    let mut turn = presenter.present_reply(reply);

    turn.toggle_series(&presenter, "Forecast");
    assert_eq!(turn.highlighted(), Some("Forecast"));
    let Some(ChartBlock::Rendered(spec)) = &turn.chart else {
        panic!("expected rendered chart");
    };
    assert_eq!(
        spec.series_named("Forecast").expect("forecast").emphasis,
        Emphasis::Emphasized
    );
    assert_eq!(
        spec.series_named("Price").expect("price").emphasis,
        Emphasis::Dimmed
    );

    turn.toggle_series(&presenter, "Forecast");
    assert_eq!(turn.highlighted(), None);
    let Some(ChartBlock::Rendered(spec)) = &turn.chart else {
        panic!("expected rendered chart");
    };
    assert!(spec.series.iter().all(|s| s.emphasis == Emphasis::Uniform));
}

#[test]
fn toggling_without_chart_is_a_no_op() {
    let presenter = presenter();
    let mut turn = presenter.present_reply(AgentReply {
        text_content: "no chart".to_owned(),
        chart_data: None,
        session_id: None,
    });
    turn.toggle_series(&presenter, "Price");
    assert_eq!(turn.highlighted(), None);
    assert!(turn.chart.is_none());
}

#[test]
fn chart_block_serializes_with_tag() {
    let turn = presenter().present_reply(AgentReply {
        text_content: String::new(),
        chart_data: Some(json!({})),
        session_id: None,
    });
    let block = serde_json::to_value(turn.chart.expect("diagnostic block")).expect("serialize");
    assert_eq!(block["block"], "diagnostic");
    assert_eq!(block["kind"], "structure_mismatch");
}

#[test]
fn clicking_unknown_series_keeps_current_focus() {
    let presenter = presenter();
    let mut turn = presenter.present_reply(AgentReply {
        text_content: String::new(),
        chart_data: Some(json!({ "x": ["a", "b"], "y": [1.0, 2.0], "ylabel": "Price" })),
        session_id: None,
    });

    turn.toggle_series(&presenter, "Ghost");
    assert_eq!(turn.highlighted(), None);
    let Some(ChartBlock::Rendered(spec)) = &turn.chart else {
        panic!("expected rendered chart");
    };
    assert_eq!(spec.highlighted, None);

    turn.toggle_series(&presenter, "Price");
    turn.toggle_series(&presenter, "Ghost");
    assert_eq!(turn.highlighted(), Some("Price"));
    let Some(ChartBlock::Rendered(spec)) = &turn.chart else {
        panic!("expected rendered chart");
    };
    assert_eq!(spec.highlighted.as_deref(), Some("Price"));
}
