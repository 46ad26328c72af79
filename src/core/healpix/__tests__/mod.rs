mod geometry_test;
