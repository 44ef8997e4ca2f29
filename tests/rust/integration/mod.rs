mod projection_request_tests;
