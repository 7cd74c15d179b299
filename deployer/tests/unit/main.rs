mod support;
mod test_diagnostics;
mod test_events;
mod test_run;
