//! Synthetic load-profile generation.

use rand::Rng;
use rand::rngs::StdRng;

/// A synthetic load profile and the directives that install it.
#[derive(Debug, Clone)]
pub struct Profile {
    /// Directives that register the load-shape and bind it to the target
    /// element's yearly slot, in issue order.
    pub commands: Vec<String>,
    /// Name of the target load element, without the object-class prefix.
    pub element_name: String,
    /// Per-timestep multipliers.
    pub values: Vec<f64>,
}

/// Makes a real-power profile for each object, drawn from a uniform
/// distribution over `[0, 1)`.
///
/// Values are drawn from `rng` in input order, one element at a time, so
/// a given seed and timestep count reproduce the same profiles bit for
/// bit. No engine calls happen here; the returned directives are issued
/// later by the pipeline.
///
/// A `timestep_count` of zero yields profiles with empty value vectors,
/// and an empty `object_names` yields an empty list. Neither is an error.
pub fn make_uniform_profiles(
    object_names: &[String],
    rng: &mut StdRng,
    timestep_count: usize,
) -> Vec<Profile> {
    let mut profiles = Vec::with_capacity(object_names.len());

    for object_name in object_names {
        let element_name = element_name(object_name).to_string();
        let profile_name = format!("{element_name}_profile");

        let values: Vec<f64> = (0..timestep_count).map(|_| rng.random::<f64>()).collect();

        // Inline the values as the engine's bracketed array form.
        let mult = values
            .iter()
            .map(f64::to_string)
            .collect::<Vec<_>>()
            .join(", ");

        let commands = vec![
            format!(
                "new Loadshape.{profile_name} npts={timestep_count} interval=1 mult=[{mult}]"
            ),
            format!("{object_name}.yearly={profile_name}"),
        ];

        profiles.push(Profile {
            commands,
            element_name,
            values,
        });
    }

    profiles
}

/// Strips the object-class prefix, e.g. `Load.house_1` to `house_1`.
fn element_name(object_name: &str) -> &str {
    object_name.rsplit('.').next().unwrap_or(object_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn objects(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn same_seed_reproduces_values_bit_for_bit() {
        let names = objects(&["Load.a", "Load.b", "Load.c"]);

        let mut rng_a = StdRng::seed_from_u64(1337);
        let mut rng_b = StdRng::seed_from_u64(1337);
        let run_a = make_uniform_profiles(&names, &mut rng_a, 16);
        let run_b = make_uniform_profiles(&names, &mut rng_b, 16);

        for (a, b) in run_a.iter().zip(&run_b) {
            assert_eq!(a.values, b.values);
            assert_eq!(a.commands, b.commands);
        }
    }

    #[test]
    fn one_profile_per_object_with_timestep_count_values() {
        let names = objects(&["Load.a", "Load.b"]);
        let mut rng = StdRng::seed_from_u64(7);
        let profiles = make_uniform_profiles(&names, &mut rng, 96);

        assert_eq!(profiles.len(), 2);
        for profile in &profiles {
            assert_eq!(profile.values.len(), 96);
            assert!(profile.values.iter().all(|v| (0.0..1.0).contains(v)));
        }
    }

    #[test]
    fn profiles_are_generated_in_input_order() {
        let names = objects(&["Load.z", "Load.a", "Load.m"]);
        let mut rng = StdRng::seed_from_u64(7);
        let profiles = make_uniform_profiles(&names, &mut rng, 4);

        let order: Vec<&str> = profiles.iter().map(|p| p.element_name.as_str()).collect();
        assert_eq!(order, vec!["z", "a", "m"]);
    }

    #[test]
    fn element_name_strips_class_prefix() {
        assert_eq!(element_name("Load.house_1"), "house_1");
        assert_eq!(element_name("bare_name"), "bare_name");
    }

    #[test]
    fn directives_register_then_bind_the_shape() {
        let names = objects(&["Load.house_1"]);
        let mut rng = StdRng::seed_from_u64(1);
        let profiles = make_uniform_profiles(&names, &mut rng, 3);

        let commands = &profiles[0].commands;
        assert_eq!(commands.len(), 2);
        assert!(
            commands[0].starts_with("new Loadshape.house_1_profile npts=3 interval=1 mult=["),
            "got {}",
            commands[0]
        );
        assert!(commands[0].ends_with(']'));
        assert_eq!(commands[1], "Load.house_1.yearly=house_1_profile");
    }

    #[test]
    fn inlined_values_round_trip_through_the_directive() {
        let names = objects(&["Load.a"]);
        let mut rng = StdRng::seed_from_u64(99);
        let profiles = make_uniform_profiles(&names, &mut rng, 5);

        let directive = &profiles[0].commands[0];
        let inline = directive
            .split_once("mult=[")
            .map(|(_, rest)| rest.trim_end_matches(']'))
            .unwrap_or("");
        let parsed: Vec<f64> = inline
            .split(", ")
            .map(|v| v.parse().expect("inlined value should parse"))
            .collect();
        assert_eq!(parsed, profiles[0].values);
    }

    #[test]
    fn zero_timesteps_give_empty_values() {
        let names = objects(&["Load.a", "Load.b"]);
        let mut rng = StdRng::seed_from_u64(7);
        let profiles = make_uniform_profiles(&names, &mut rng, 0);

        assert_eq!(profiles.len(), 2);
        for profile in &profiles {
            assert!(profile.values.is_empty());
            assert!(profile.commands[0].contains("npts=0"));
        }
    }

    #[test]
    fn empty_input_gives_empty_list() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(make_uniform_profiles(&[], &mut rng, 10).is_empty());
    }
}
