mod facade_config;
