use shared::metrics_defs::{MetricDef, MetricType};

pub const REQUESTS_RELAYED: MetricDef = MetricDef {
    name: "requests.relayed",
    metric_type: MetricType::Counter,
    description: "Requests forwarded upstream. Tagged with route.",
};

pub const UPSTREAM_ERRORS: MetricDef = MetricDef {
    name: "upstream.errors",
    metric_type: MetricType::Counter,
    description: "Transport-level failures reaching the upstream. Tagged with route.",
};

pub const UPSTREAM_NON_2XX: MetricDef = MetricDef {
    name: "upstream.non_2xx",
    metric_type: MetricType::Counter,
    description: "Non-2xx upstream statuses relayed to the caller. Tagged with route.",
};

pub const ALL_METRICS: &[MetricDef] = &[REQUESTS_RELAYED, UPSTREAM_ERRORS, UPSTREAM_NON_2XX];
