mod flatten_properties_tests;
