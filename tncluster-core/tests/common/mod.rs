use proptest::test_runner::Config as ProptestConfig;
use tncluster_test_support::ci::property_test_profile::ProptestRunProfile;

/// Proptest configuration honouring the shared CI profile.
#[must_use]
pub fn proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}
